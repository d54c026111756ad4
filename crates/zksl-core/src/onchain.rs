//! Shared on-ledger record shapes. These records are created and mutated by
//! the external verifier program; this workspace only ever reads them
//! (except `ProofRecord`/`ValidatorRecord`, which the indexer also decodes
//! from raw account bytes — see `zksl-indexer`).

use serde::{Deserialize, Serialize};

use crate::types::{LedgerPubkey, Seq};

/// Process-wide aggregator configuration. Created once at system
/// initialization; mutated only by the administrator via the verifier
/// program; read (never written) by this core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    pub aggregator_pubkey: LedgerPubkey,
    pub next_aggregator_pubkey: LedgerPubkey,
    pub activation_seq: Seq,
    pub chain_id: u64,
}

impl AggregatorConfig {
    /// The pubkey allowed to sign for `seq`, per the activation cliff rule:
    /// `seq >= activation_seq` uses the next key, otherwise the current one.
    /// There is no overlap window.
    pub fn allowed_pubkey(&self, seq: Seq) -> LedgerPubkey {
        if seq >= self.activation_seq {
            self.next_aggregator_pubkey
        } else {
            self.aggregator_pubkey
        }
    }
}

/// On-ledger record tracking the last accepted anchor sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorState {
    pub last_seq: Seq,
}

/// On-ledger record enforcing monotonic, non-overlapping slot ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeState {
    pub last_end_slot: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_cliff_has_no_overlap() {
        let cfg = AggregatorConfig {
            aggregator_pubkey: LedgerPubkey([1u8; 32]),
            next_aggregator_pubkey: LedgerPubkey([2u8; 32]),
            activation_seq: 100,
            chain_id: 1,
        };
        assert_eq!(cfg.allowed_pubkey(99), LedgerPubkey([1u8; 32]));
        assert_eq!(cfg.allowed_pubkey(100), LedgerPubkey([2u8; 32]));
        assert_eq!(cfg.allowed_pubkey(101), LedgerPubkey([2u8; 32]));
    }
}
