//! Reconciliation cycle: re-queries signature status for rows still below
//! finalized commitment, bumping the stored level or purging rows the
//! ledger has forgotten about.

use chrono::Utc;
use tracing::{info, warn};
use zksl_core::CommitmentLevel;
use zksl_submit::LedgerClient;

use crate::store::{ProofStore, StoreError};

/// Rows older than this with no known ledger signature are presumed
/// dropped and purged.
pub const DROP_AFTER_SECS: i64 = 60;

/// The pure decision a reconciliation cycle makes for one row, factored out
/// of the I/O so it can be unit-tested without a live database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    NoOp,
    Bump(CommitmentLevel),
    Purge,
}

/// Decide what to do with one pending row given the ledger's reported
/// status (`None` means the ledger has no record of the signature).
pub fn decide(
    current_level: CommitmentLevel,
    ledger_status: Option<CommitmentLevel>,
    age_secs: i64,
) -> ReconcileAction {
    match ledger_status {
        Some(level) if level > current_level => ReconcileAction::Bump(level),
        Some(_) => ReconcileAction::NoOp,
        None if age_secs > DROP_AFTER_SECS => ReconcileAction::Purge,
        None => ReconcileAction::NoOp,
    }
}

pub async fn run_reconciliation_cycle<L: LedgerClient>(
    store: &ProofStore,
    ledger: &L,
) -> Result<(), StoreError> {
    let rows = store.pending_reconciliation_rows().await?;
    let now = Utc::now();

    for row in rows {
        let age_secs = (now - row.ts).num_seconds();
        let current_level = CommitmentLevel::from_i16(row.commitment_level).unwrap_or(CommitmentLevel::Processed);

        let status = match &row.txid {
            Some(txid) => ledger.get_signature_status(txid).await,
            None => Ok(None),
        };

        let status = match status {
            Ok(status) => status.map(|s| s.commitment_level),
            Err(e) => {
                warn!(error = %e, seq = row.seq, "reconciliation: failed to query signature status");
                continue;
            }
        };

        match decide(current_level, status, age_secs) {
            ReconcileAction::Bump(level) => {
                store.bump_commitment_level(&row.proof_hash, row.seq, level).await?;
            }
            ReconcileAction::Purge => {
                info!(seq = row.seq, "reconciliation: purging row, ledger has no record");
                store.purge(&row.proof_hash, row.seq).await?;
            }
            ReconcileAction::NoOp => {}
        }
    }

    store.mark_reconciled(now).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S6: a row with no known ledger signature, older than the drop
    /// threshold, is purged.
    #[test]
    fn s6_purges_row_the_ledger_has_forgotten() {
        let action = decide(CommitmentLevel::Processed, None, DROP_AFTER_SECS + 1);
        assert_eq!(action, ReconcileAction::Purge);
    }

    #[test]
    fn recently_unknown_row_is_left_alone() {
        let action = decide(CommitmentLevel::Processed, None, DROP_AFTER_SECS - 1);
        assert_eq!(action, ReconcileAction::NoOp);
    }

    #[test]
    fn higher_ledger_status_bumps_the_level() {
        let action = decide(
            CommitmentLevel::Processed,
            Some(CommitmentLevel::Finalized),
            5,
        );
        assert_eq!(action, ReconcileAction::Bump(CommitmentLevel::Finalized));
    }

    #[test]
    fn equal_or_lower_ledger_status_is_a_no_op() {
        assert_eq!(
            decide(CommitmentLevel::Confirmed, Some(CommitmentLevel::Confirmed), 5),
            ReconcileAction::NoOp
        );
    }
}
