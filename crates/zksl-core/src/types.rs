use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Slot index on the external ledger. Both ends of a range are inclusive.
pub type Slot = u64;

/// Monotonically increasing anchor sequence number assigned by the verifier program.
pub type Seq = u64;

/// Unix timestamp, seconds, UTC.
pub type Timestamp = i64;

/// Maximum number of slots a single artifact may span (`end_slot - start_slot + 1`).
pub const MAX_ARTIFACT_SLOTS: u64 = 2048;

// ── Hex32 ────────────────────────────────────────────────────────────────────

/// A validated 32-byte value, always rendered as 64 lowercase hex characters.
///
/// Construction normalizes case; it does not accept anything but
/// `[0-9a-fA-F]{64}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hex32(pub [u8; 32]);

impl Hex32 {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Hex32 {
    type Err = HexDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HexDecodeError::WrongShape { len: s.len() });
        }
        let lower = s.to_ascii_lowercase();
        let bytes = hex::decode(&lower).map_err(|e| HexDecodeError::Invalid(e.to_string()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HexDecodeError {
    #[error("expected 64 hex characters, got {len}")]
    WrongShape { len: usize },
    #[error("invalid hex: {0}")]
    Invalid(String),
}

impl fmt::Display for Hex32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hex32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hex32({}…)", &self.to_hex()[..8])
    }
}

impl Serialize for Hex32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hex32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hex32::from_str(&s).map_err(DeError::custom)
    }
}

// ── ProofHash ────────────────────────────────────────────────────────────────

/// BLAKE3 digest of the canonical encoding of a minimal [`Artifact`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofHash(pub [u8; 32]);

impl ProofHash {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ProofHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ProofHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProofHash({}…)", &self.to_hex()[..16])
    }
}

// ── Artifact ─────────────────────────────────────────────────────────────────

/// The minimal fingerprint of a state transition over an inclusive slot range.
///
/// Immutable once constructed: the content-addressed identifier is derived
/// from these four fields alone (see `zksl-codec`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub start_slot: Slot,
    pub end_slot: Slot,
    pub state_root_before: Hex32,
    pub state_root_after: Hex32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("end_slot ({end_slot}) must be >= start_slot ({start_slot})")]
    EndBeforeStart { start_slot: Slot, end_slot: Slot },
    #[error("artifact spans {span} slots, maximum is {max}")]
    RangeTooLarge { span: u64, max: u64 },
}

impl Artifact {
    /// Construct a new artifact, validating the inclusive-range invariants from
    /// the spec: `end_slot >= start_slot` and span <= [`MAX_ARTIFACT_SLOTS`].
    pub fn new(
        start_slot: Slot,
        end_slot: Slot,
        state_root_before: Hex32,
        state_root_after: Hex32,
    ) -> Result<Self, ArtifactError> {
        if end_slot < start_slot {
            return Err(ArtifactError::EndBeforeStart {
                start_slot,
                end_slot,
            });
        }
        let span = end_slot - start_slot + 1;
        if span > MAX_ARTIFACT_SLOTS {
            return Err(ArtifactError::RangeTooLarge {
                span,
                max: MAX_ARTIFACT_SLOTS,
            });
        }
        Ok(Self {
            start_slot,
            end_slot,
            state_root_before,
            state_root_after,
        })
    }
}

// ── ArtifactId ───────────────────────────────────────────────────────────────

/// RFC 4122 version-4-shaped UUID deterministically derived from a proof-hash.
///
/// Despite the v4 version nibble (required so generic UUID tooling accepts
/// it), this is never randomly generated — see `zksl_codec::artifact::derive_identifier`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub uuid::Uuid);

impl ArtifactId {
    pub fn from_uuid(u: uuid::Uuid) -> Self {
        Self(u)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtifactId({})", self.0)
    }
}

// ── Ledger-facing raw identifiers ─────────────────────────────────────────────

/// Raw 32-byte public key on the external ledger (program id, pubkey, etc).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerPubkey(pub [u8; 32]);

impl LedgerPubkey {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for LedgerPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerPubkey({}…)", &self.to_hex()[..8])
    }
}

/// Finality grade assigned by the external ledger to a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i16)]
pub enum CommitmentLevel {
    Processed = 0,
    Confirmed = 1,
    Finalized = 2,
}

impl CommitmentLevel {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Processed),
            1 => Some(Self::Confirmed),
            2 => Some(Self::Finalized),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex32_normalizes_case() {
        let upper = "AB".repeat(32);
        let lower = "ab".repeat(32);
        let a = Hex32::from_str(&upper).unwrap();
        let b = Hex32::from_str(&lower).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), lower);
    }

    #[test]
    fn hex32_rejects_wrong_length() {
        assert!(Hex32::from_str(&"ab".repeat(31)).is_err());
    }

    #[test]
    fn hex32_rejects_non_hex() {
        let s = "G".repeat(64);
        assert!(Hex32::from_str(&s).is_err());
    }

    #[test]
    fn artifact_rejects_end_before_start() {
        let root = Hex32::from_bytes([0u8; 32]);
        assert!(Artifact::new(10, 9, root, root).is_err());
    }

    #[test]
    fn artifact_rejects_oversized_range() {
        let root = Hex32::from_bytes([0u8; 32]);
        assert!(Artifact::new(0, 3000, root, root).is_err());
        assert!(Artifact::new(0, 2047, root, root).is_ok());
    }
}
