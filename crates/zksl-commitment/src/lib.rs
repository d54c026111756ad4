//! The domain-separated commitment: a fixed 110-byte preimage committing to
//! (chain, program, proof-hash, range, seq), and its BLAKE3 digest.
//!
//! Changing the DS literal is how a future wire version avoids cross-version
//! replay (see the spec's open question); this crate only ever emits v1.

use zksl_codec::le::write_u64;
use zksl_core::{LedgerPubkey, ProofHash, Seq, Slot};

/// ASCII domain-separation literal for this wire version. Bumping to v2
/// requires a new literal here, not a version field — there is no overlap
/// window by design.
pub const DS_LITERAL_V1: &[u8; 14] = b"zKSL/anchor/v1";

/// Total length of the commitment preimage, in bytes. A future field
/// addition that breaks this invariant fails to compile.
pub const PREIMAGE_LEN: usize = 110;

const _: () = assert!(
    DS_LITERAL_V1.len() + 8 + 32 + 32 + 8 + 8 + 8 == PREIMAGE_LEN,
    "commitment preimage layout must total exactly 110 bytes"
);

/// Inputs needed to build a commitment preimage, independent of how the
/// caller sourced them (request body, on-chain config, local sequencing).
#[derive(Clone, Debug)]
pub struct CommitmentInputs {
    pub chain_id: u64,
    pub program_id: LedgerPubkey,
    pub proof_hash: ProofHash,
    pub start_slot: Slot,
    pub end_slot: Slot,
    pub seq: Seq,
}

/// The 110-byte domain-separated commitment preimage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentPreimage(pub [u8; PREIMAGE_LEN]);

impl CommitmentPreimage {
    /// Build the preimage by concatenating, in order: the DS literal,
    /// `chain_id` (u64 LE), `program_id`, `proof_hash`, `start_slot` (u64 LE),
    /// `end_slot` (u64 LE), `seq` (u64 LE).
    pub fn build(inputs: &CommitmentInputs) -> Self {
        let mut buf = Vec::with_capacity(PREIMAGE_LEN);
        buf.extend_from_slice(DS_LITERAL_V1);
        write_u64(&mut buf, inputs.chain_id);
        buf.extend_from_slice(&inputs.program_id.0);
        buf.extend_from_slice(inputs.proof_hash.as_bytes());
        write_u64(&mut buf, inputs.start_slot);
        write_u64(&mut buf, inputs.end_slot);
        write_u64(&mut buf, inputs.seq);

        debug_assert_eq!(buf.len(), PREIMAGE_LEN);
        let mut out = [0u8; PREIMAGE_LEN];
        out.copy_from_slice(&buf);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; PREIMAGE_LEN] {
        &self.0
    }

    /// BLAKE3 digest of the preimage. Changing any input field changes this
    /// digest with overwhelming probability (BLAKE3 collision resistance).
    pub fn digest(&self) -> [u8; 32] {
        *blake3::hash(&self.0).as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kat_inputs() -> CommitmentInputs {
        CommitmentInputs {
            chain_id: 1,
            program_id: LedgerPubkey([0u8; 32]),
            proof_hash: ProofHash::from_bytes([0u8; 32]),
            start_slot: 1,
            end_slot: 1,
            seq: 1,
        }
    }

    /// S1: known-answer preimage length and digest stability.
    #[test]
    fn s1_ds_kat_length_and_stability() {
        let inputs = kat_inputs();
        let preimage = CommitmentPreimage::build(&inputs);
        assert_eq!(preimage.as_bytes().len(), 110);

        let digest_a = preimage.digest();
        let digest_b = CommitmentPreimage::build(&inputs).digest();
        assert_eq!(digest_a, digest_b);
    }

    /// S2: changing chain_id changes the digest.
    #[test]
    fn s2_ds_negative_chain_id() {
        let mut inputs = kat_inputs();
        let d1 = CommitmentPreimage::build(&inputs).digest();
        inputs.chain_id = 2;
        let d2 = CommitmentPreimage::build(&inputs).digest();
        assert_ne!(d1, d2);
    }

    #[test]
    fn every_field_changes_the_digest() {
        let base = kat_inputs();
        let base_digest = CommitmentPreimage::build(&base).digest();

        let mut variants = Vec::new();
        let mut v = base.clone();
        v.program_id = LedgerPubkey([1u8; 32]);
        variants.push(v);

        let mut v = base.clone();
        v.proof_hash = ProofHash::from_bytes([1u8; 32]);
        variants.push(v);

        let mut v = base.clone();
        v.start_slot = 2;
        variants.push(v);

        let mut v = base.clone();
        v.end_slot = 2;
        variants.push(v);

        let mut v = base.clone();
        v.seq = 2;
        variants.push(v);

        for variant in variants {
            assert_ne!(CommitmentPreimage::build(&variant).digest(), base_digest);
        }
    }
}
