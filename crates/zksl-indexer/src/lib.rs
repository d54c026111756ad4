pub mod polling;
pub mod reconcile;
pub mod records;
pub mod store;
pub mod streaming;

pub use polling::{run_poll_cycle, POLL_INTERVAL_SECS};
pub use reconcile::{decide, run_reconciliation_cycle, ReconcileAction};
pub use records::{decode_account, DecodedAccount, ProofRecord, ValidatorRecord, ValidatorStatus};
pub use store::{ProofRow, ProofStore, StoreError, ValidatorRow};
pub use streaming::handle_account_change;
