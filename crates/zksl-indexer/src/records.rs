//! Decoders for the two account record kinds the indexer reads back off
//! the ledger. Both are distinguished by an 8-byte discriminator: the first
//! 8 bytes of SHA-256 of a label, the same convention `zksl-submit::payload`
//! uses for the instruction discriminator.

use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zksl_codec::le::{read_i64, read_u32, read_u64, ReadError};
use zksl_core::{ArtifactId, Hex32, LedgerPubkey, ProofHash, Seq, Slot, Timestamp};

pub const PROOF_RECORD_PAYLOAD_LEN: usize = 212;
pub const VALIDATOR_RECORD_PAYLOAD_LEN: usize = 32 + 32 + 8 + 1 + 8 + 47;

fn discriminator(label: &str) -> [u8; 8] {
    let digest = Sha256::digest(label.as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

pub fn proof_record_discriminator() -> [u8; 8] {
    discriminator("account:ProofRecord")
}

pub fn validator_record_discriminator() -> [u8; 8] {
    discriminator("account:ValidatorRecord")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("account data shorter than the 8-byte discriminator")]
    Truncated,
    #[error("discriminator does not match any known record kind")]
    UnknownDiscriminator,
    #[error("decoding fixed-width field: {0}")]
    Field(#[from] ReadError),
    #[error("unrecognized validator status byte {0}")]
    UnrecognizedStatus(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRecord {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorStatus {
    Active = 0,
    Unlocked = 1,
}

impl ValidatorStatus {
    fn from_byte(b: u8) -> Result<Self, DecodeError> {
        match b {
            0 => Ok(Self::Active),
            1 => Ok(Self::Unlocked),
            other => Err(DecodeError::UnrecognizedStatus(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorRecord {
    pub pubkey: LedgerPubkey,
    pub escrow: LedgerPubkey,
    pub lock_ts: Timestamp,
    pub status: ValidatorStatus,
    pub num_accepts: u64,
}

/// The decoded shape of one program-owned account, dispatched on its
/// leading discriminator. Accounts bearing an unrecognized discriminator
/// are not an error at this layer — the caller skips them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAccount {
    Proof(ProofRecord),
    Validator(ValidatorRecord),
}

pub fn decode_account(data: &[u8]) -> Result<Option<DecodedAccount>, DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::Truncated);
    }
    let disc: [u8; 8] = data[..8].try_into().unwrap();
    if disc == proof_record_discriminator() {
        Ok(Some(DecodedAccount::Proof(decode_proof_record(
            &data[8..],
        )?)))
    } else if disc == validator_record_discriminator() {
        Ok(Some(DecodedAccount::Validator(decode_validator_record(
            &data[8..],
        )?)))
    } else {
        Ok(None)
    }
}

fn decode_proof_record(payload: &[u8]) -> Result<ProofRecord, DecodeError> {
    if payload.len() < PROOF_RECORD_PAYLOAD_LEN {
        return Err(DecodeError::Truncated);
    }

    let artifact_id_bytes: [u8; 16] = payload[0..16].try_into().unwrap();
    let proof_hash: [u8; 32] = payload[16..48].try_into().unwrap();
    let seq = read_u64(payload, 48)?;
    let start_slot = read_u64(payload, 56)?;
    let end_slot = read_u64(payload, 64)?;
    let artifact_len = read_u32(payload, 72)?;
    let state_root_before: [u8; 32] = payload[76..108].try_into().unwrap();
    let state_root_after: [u8; 32] = payload[108..140].try_into().unwrap();
    let aggregator_pubkey: [u8; 32] = payload[140..172].try_into().unwrap();
    let timestamp = read_i64(payload, 172)?;
    let ds_hash: [u8; 32] = payload[180..212].try_into().unwrap();

    Ok(ProofRecord {
        artifact_id: ArtifactId::from_uuid(Uuid::from_bytes(artifact_id_bytes)),
        proof_hash: ProofHash::from_bytes(proof_hash),
        seq,
        start_slot,
        end_slot,
        artifact_len,
        state_root_before: Hex32::from_bytes(state_root_before),
        state_root_after: Hex32::from_bytes(state_root_after),
        aggregator_pubkey: LedgerPubkey(aggregator_pubkey),
        timestamp,
        ds_hash,
    })
}

fn decode_validator_record(payload: &[u8]) -> Result<ValidatorRecord, DecodeError> {
    if payload.len() < VALIDATOR_RECORD_PAYLOAD_LEN {
        return Err(DecodeError::Truncated);
    }

    let pubkey: [u8; 32] = payload[0..32].try_into().unwrap();
    let escrow: [u8; 32] = payload[32..64].try_into().unwrap();
    let lock_ts = read_i64(payload, 64)?;
    let status = ValidatorStatus::from_byte(payload[72])?;
    let num_accepts = read_u64(payload, 73)?;
    // Remaining 47 reserved bytes are ignored.

    Ok(ValidatorRecord {
        pubkey: LedgerPubkey(pubkey),
        escrow: LedgerPubkey(escrow),
        lock_ts,
        status,
        num_accepts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zksl_codec::le::{write_i64, write_u32, write_u64};

    fn encode_proof_record() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&proof_record_discriminator());
        out.extend_from_slice(Uuid::nil().as_bytes());
        out.extend_from_slice(&[1u8; 32]);
        write_u64(&mut out, 7);
        write_u64(&mut out, 10);
        write_u64(&mut out, 20);
        write_u32(&mut out, 256);
        out.extend_from_slice(&[2u8; 32]);
        out.extend_from_slice(&[3u8; 32]);
        out.extend_from_slice(&[4u8; 32]);
        write_i64(&mut out, 1_700_000_000);
        out.extend_from_slice(&[5u8; 32]);
        out
    }

    fn encode_validator_record(status: u8) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&validator_record_discriminator());
        out.extend_from_slice(&[9u8; 32]);
        out.extend_from_slice(&[8u8; 32]);
        write_i64(&mut out, 1_700_000_000);
        out.push(status);
        write_u64(&mut out, 3);
        out.extend_from_slice(&[0u8; 47]);
        out
    }

    #[test]
    fn decodes_proof_record_round_trip() {
        let data = encode_proof_record();
        let decoded = decode_account(&data).unwrap().unwrap();
        match decoded {
            DecodedAccount::Proof(record) => {
                assert_eq!(record.seq, 7);
                assert_eq!(record.start_slot, 10);
                assert_eq!(record.end_slot, 20);
                assert_eq!(record.artifact_len, 256);
            }
            _ => panic!("expected proof record"),
        }
    }

    #[test]
    fn decodes_validator_record_round_trip() {
        let data = encode_validator_record(1);
        let decoded = decode_account(&data).unwrap().unwrap();
        match decoded {
            DecodedAccount::Validator(record) => {
                assert_eq!(record.status, ValidatorStatus::Unlocked);
                assert_eq!(record.num_accepts, 3);
            }
            _ => panic!("expected validator record"),
        }
    }

    #[test]
    fn unknown_discriminator_yields_none() {
        let data = vec![0xffu8; 64];
        assert_eq!(decode_account(&data).unwrap(), None);
    }

    #[test]
    fn truncated_account_is_an_error() {
        assert_eq!(decode_account(&[1, 2, 3]), Err(DecodeError::Truncated));
    }
}
