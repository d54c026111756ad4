//! Polling discipline: every 20 seconds (and immediately on startup), scans
//! every account owned by the verifier program and reconciles newly
//! observed proof records against their on-ledger signature status.

use chrono::Utc;
use tracing::{info, warn};
use zksl_core::{CommitmentLevel, LedgerPubkey};
use zksl_submit::LedgerClient;

use crate::records::{decode_account, DecodedAccount};
use crate::store::{ProofStore, StoreError};

pub const POLL_INTERVAL_SECS: u64 = 20;

pub async fn run_poll_cycle<L: LedgerClient>(
    store: &ProofStore,
    ledger: &L,
    program_id: &LedgerPubkey,
) -> Result<(), StoreError> {
    let scanned_at = Utc::now();
    let last_seen_slot = store.last_seen_slot().await?;

    let accounts = match ledger.get_program_accounts(program_id).await {
        Ok(accounts) => accounts,
        Err(e) => {
            warn!(error = %e, "polling: failed to fetch program accounts, retrying next cycle");
            return Ok(());
        }
    };

    let mut max_end_slot = last_seen_slot as u64;
    let mut last_signature = None;

    for account in accounts {
        let decoded = match decode_account(&account.data) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, pubkey = %account.pubkey.to_hex(), "polling: failed to decode account");
                continue;
            }
        };

        match decoded {
            Some(DecodedAccount::Validator(record)) => {
                if let Err(e) = store.upsert_validator(&record).await {
                    warn!(error = %e, "polling: validator upsert failed");
                }
            }
            Some(DecodedAccount::Proof(record)) => {
                if record.end_slot <= last_seen_slot as u64 {
                    continue;
                }

                let signature = match ledger
                    .earliest_signature_for_address(&account.pubkey)
                    .await
                {
                    Ok(sig) => sig,
                    Err(e) => {
                        warn!(error = %e, "polling: failed to resolve signature for proof record");
                        continue;
                    }
                };

                let commitment_level = match &signature {
                    Some(sig) => match ledger.get_signature_status(sig).await {
                        Ok(Some(status)) => status.commitment_level,
                        Ok(None) => CommitmentLevel::Processed,
                        Err(e) => {
                            warn!(error = %e, "polling: failed to query signature status");
                            continue;
                        }
                    },
                    None => CommitmentLevel::Processed,
                };

                let aggregator_pubkey_hex = record.aggregator_pubkey.to_hex();
                store
                    .upsert_proof(
                        &record,
                        &aggregator_pubkey_hex,
                        commitment_level,
                        signature.as_deref(),
                    )
                    .await?;

                max_end_slot = max_end_slot.max(record.end_slot);
                if commitment_level >= CommitmentLevel::Confirmed {
                    last_signature = signature.or(last_signature);
                }
            }
            None => {}
        }
    }

    store
        .advance_cursor(max_end_slot as i64, last_signature.as_deref(), scanned_at)
        .await?;

    info!(last_seen_slot = max_end_slot, "polling: cycle complete");
    Ok(())
}
