//! Streaming discipline: reacts to account-change events as they arrive.
//! Validator records are upserted immediately; proof records are not, since
//! the stream carries no verified transaction signature to anchor a
//! commitment level to.

use tracing::{debug, warn};

use crate::records::{decode_account, DecodedAccount};
use crate::store::{ProofStore, StoreError};

pub async fn handle_account_change(
    store: &ProofStore,
    account_data: &[u8],
) -> Result<(), StoreError> {
    match decode_account(account_data) {
        Ok(Some(DecodedAccount::Validator(record))) => {
            debug!(pubkey = %record.pubkey.to_hex(), "streaming: validator upsert");
            store.upsert_validator(&record).await?;
        }
        Ok(Some(DecodedAccount::Proof(_))) => {
            debug!("streaming: proof record change observed, deferring to the polling path");
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "streaming: failed to decode account change"),
    }
    Ok(())
}
