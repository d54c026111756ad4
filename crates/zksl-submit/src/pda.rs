//! Program-derived address derivation. Deterministic, seed-based addresses
//! computed the same way by this orchestrator and by `zksl-indexer`, so both
//! sides agree on where a given record lives without any coordination.
//!
//! The external ledger's actual address derivation additionally walks a bump
//! seed to avoid points on the Ed25519 curve; that step is the verifier
//! program's concern (it owns account creation), not ours — we only need a
//! stable function of (seeds, program_id) that both our components compute
//! identically, which a single SHA-256 over the concatenated seeds already
//! gives us.

use sha2::{Digest, Sha256};
use zksl_core::{LedgerPubkey, ProofHash, Seq};

fn derive(seeds: &[&[u8]], program_id: &LedgerPubkey) -> LedgerPubkey {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.0);
    hasher.update(b"ProgramDerivedAddress");
    LedgerPubkey(hasher.finalize().into())
}

pub fn configuration_address(program_id: &LedgerPubkey) -> LedgerPubkey {
    derive(&[b"zksl", b"config"], program_id)
}

pub fn aggregator_state_address(program_id: &LedgerPubkey) -> LedgerPubkey {
    derive(&[b"zksl", b"aggregator"], program_id)
}

pub fn range_state_address(program_id: &LedgerPubkey) -> LedgerPubkey {
    derive(&[b"zksl", b"range"], program_id)
}

pub fn proof_record_address(
    program_id: &LedgerPubkey,
    proof_hash: &ProofHash,
    seq: Seq,
) -> LedgerPubkey {
    derive(
        &[b"zksl", b"proof", proof_hash.as_bytes(), &seq.to_le_bytes()],
        program_id,
    )
}

pub fn validator_record_address(
    program_id: &LedgerPubkey,
    validator_pubkey: &LedgerPubkey,
) -> LedgerPubkey {
    derive(&[b"zksl", b"validator", &validator_pubkey.0], program_id)
}
