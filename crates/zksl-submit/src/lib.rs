pub mod idempotency;
pub mod ledger;
pub mod orchestrator;
pub mod payload;
pub mod pda;
pub mod transaction;

pub use idempotency::{CachedResponse, IdempotencyCache};
pub use ledger::{
    JsonRpcLedgerClient, LedgerClient, LocalModeLedgerClient, OwnedAccount, SignatureStatus,
    VerifierRpcError,
};
pub use orchestrator::{AnchorOutcome, AnchorRequest, SubmissionOrchestrator};
