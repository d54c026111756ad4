use serde_json::json;
use zksl_core::{Artifact, ArtifactId, ProofHash};

use crate::canonical::canonicalize;

/// Compute the BLAKE3 proof-hash of an artifact: the digest of the canonical
/// encoding of an object containing exactly the four artifact fields, roots
/// lowercased hex.
pub fn proof_hash(artifact: &Artifact) -> ProofHash {
    let value = json!({
        "start_slot": artifact.start_slot,
        "end_slot": artifact.end_slot,
        "state_root_before": artifact.state_root_before.to_hex(),
        "state_root_after": artifact.state_root_after.to_hex(),
    });
    let canonical = canonicalize(&value);
    let digest = blake3::hash(canonical.as_bytes());
    ProofHash::from_bytes(*digest.as_bytes())
}

/// Derive the artifact identifier from a proof-hash: the first 16 bytes of
/// the proof-hash, with the UUID version nibble forced to 0100 and the
/// variant bits forced to 10, per RFC 4122.
pub fn derive_identifier(hash: &ProofHash) -> ArtifactId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash.as_bytes()[..16]);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    ArtifactId::from_uuid(uuid::Uuid::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zksl_core::Hex32;
    use std::str::FromStr;

    fn sample_artifact() -> Artifact {
        Artifact::new(
            1,
            1,
            Hex32::from_str(&"00".repeat(32)).unwrap(),
            Hex32::from_str(&"11".repeat(32)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn proof_hash_is_deterministic() {
        let a = sample_artifact();
        assert_eq!(proof_hash(&a).to_hex(), proof_hash(&a).to_hex());
    }

    #[test]
    fn proof_hash_changes_with_any_field() {
        let a = sample_artifact();
        let mut b = a.clone();
        b.end_slot = 2;
        assert_ne!(proof_hash(&a).to_hex(), proof_hash(&b).to_hex());
    }

    #[test]
    fn identifier_is_rfc4122_v4_shaped() {
        let a = sample_artifact();
        let hash = proof_hash(&a);
        let id = derive_identifier(&hash);
        let bytes = id.as_bytes();
        assert_eq!(bytes[6] & 0xf0, 0x40);
        assert_eq!(bytes[8] & 0xc0, 0x80);
    }

    #[test]
    fn identifier_is_deterministic_from_proof_hash() {
        let a = sample_artifact();
        let hash = proof_hash(&a);
        assert_eq!(derive_identifier(&hash).0, derive_identifier(&hash).0);
    }
}
