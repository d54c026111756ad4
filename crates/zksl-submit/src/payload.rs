//! The anchor-proof instruction payload: an 8-byte discriminator followed by
//! the 212-byte fixed layout the verifier program expects.

use sha2::{Digest, Sha256};
use zksl_codec::le::{write_i64, write_u32, write_u64};
use zksl_core::{ArtifactId, Hex32, LedgerPubkey, ProofHash, Seq, Slot, Timestamp};

pub const DISCRIMINATOR_PREIMAGE: &str = "global:anchor_proof";
pub const PAYLOAD_LEN: usize = 212;
pub const INSTRUCTION_LEN: usize = 8 + PAYLOAD_LEN;

/// Inputs required to encode one anchor-proof instruction.
pub struct AnchorPayload {
    pub artifact_id: ArtifactId,
    pub proof_hash: ProofHash,
    pub seq: Seq,
    pub start_slot: Slot,
    pub end_slot: Slot,
    pub artifact_len: u32,
    pub state_root_before: Hex32,
    pub state_root_after: Hex32,
    pub aggregator_pubkey: LedgerPubkey,
    pub timestamp: Timestamp,
    pub ds_hash: [u8; 32],
}

/// First 8 bytes of `sha256("global:anchor_proof")`, Anchor's own
/// discriminator convention for a named instruction.
pub fn discriminator() -> [u8; 8] {
    let digest = Sha256::digest(DISCRIMINATOR_PREIMAGE.as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Encode the full 220-byte instruction: 8-byte discriminator + 212-byte payload.
pub fn encode(payload: &AnchorPayload) -> Vec<u8> {
    let mut out = Vec::with_capacity(INSTRUCTION_LEN);
    out.extend_from_slice(&discriminator());
    out.extend_from_slice(payload.artifact_id.as_bytes());
    out.extend_from_slice(payload.proof_hash.as_bytes());
    write_u64(&mut out, payload.seq);
    write_u64(&mut out, payload.start_slot);
    write_u64(&mut out, payload.end_slot);
    write_u32(&mut out, payload.artifact_len);
    out.extend_from_slice(payload.state_root_before.as_bytes());
    out.extend_from_slice(payload.state_root_after.as_bytes());
    out.extend_from_slice(&payload.aggregator_pubkey.0);
    write_i64(&mut out, payload.timestamp);
    out.extend_from_slice(&payload.ds_hash);

    debug_assert_eq!(out.len(), INSTRUCTION_LEN);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample() -> AnchorPayload {
        AnchorPayload {
            artifact_id: ArtifactId::from_uuid(Uuid::nil()),
            proof_hash: ProofHash::from_bytes([1u8; 32]),
            seq: 1,
            start_slot: 1,
            end_slot: 1,
            artifact_len: 128,
            state_root_before: Hex32::from_bytes([2u8; 32]),
            state_root_after: Hex32::from_bytes([3u8; 32]),
            aggregator_pubkey: LedgerPubkey([4u8; 32]),
            timestamp: 1_700_000_000,
            ds_hash: [5u8; 32],
        }
    }

    /// Invariant 2: total length 220, discriminator equals
    /// `sha256("global:anchor_proof")[:8]`.
    #[test]
    fn encoded_instruction_is_220_bytes_with_correct_discriminator() {
        let encoded = encode(&sample());
        assert_eq!(encoded.len(), 220);
        assert_eq!(&encoded[..8], &discriminator()[..]);
    }

    #[test]
    fn field_order_round_trips_through_offsets() {
        let payload = sample();
        let encoded = encode(&payload);
        assert_eq!(&encoded[8..24], payload.artifact_id.as_bytes());
        assert_eq!(&encoded[24..56], payload.proof_hash.as_bytes());
    }
}
