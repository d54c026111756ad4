//! Ties the codec, commitment, signer, and transport crates together into
//! the end-to-end submission flow described for C4: fetch on-chain config,
//! derive the next sequence, enforce the chain-id and key-activation
//! checks, assemble the transaction, submit, and map verifier errors.

use chrono::Utc;
use zksl_commitment::{CommitmentInputs, CommitmentPreimage};
use zksl_core::{AggregatorConfig, AggregatorState, AnchorError, Artifact, ArtifactId, LedgerPubkey, ProofHash, Seq, VerifierErrorCode};
use zksl_signer::AggregatorSigner;

use crate::ledger::{LedgerClient, VerifierRpcError};
use crate::pda;
use crate::payload::{self, AnchorPayload};
use crate::transaction::{self, AnchorCallAccounts, AnchorTransaction};

pub struct AnchorRequest<'a> {
    pub artifact: &'a Artifact,
    pub artifact_id: ArtifactId,
    pub proof_hash: ProofHash,
    pub artifact_len: u32,
    pub fee_payer: LedgerPubkey,
}

pub struct AnchorOutcome {
    pub transaction_id: String,
    pub seq: Seq,
    pub aggregator_signature: [u8; 64],
    pub ds_hash: [u8; 32],
}

/// Reads on-ledger configuration and state, derives the next sequence,
/// signs, composes, and submits an anchor transaction for one artifact.
pub struct SubmissionOrchestrator<L: LedgerClient> {
    ledger: L,
    signer: AggregatorSigner,
    program_id: LedgerPubkey,
    local_chain_id: u64,
}

impl<L: LedgerClient> SubmissionOrchestrator<L> {
    pub fn new(ledger: L, signer: AggregatorSigner, program_id: LedgerPubkey, local_chain_id: u64) -> Self {
        Self {
            ledger,
            signer,
            program_id,
            local_chain_id,
        }
    }

    async fn fetch_config(&self) -> Result<AggregatorConfig, AnchorError> {
        let address = pda::configuration_address(&self.program_id);
        let data = self
            .ledger
            .get_account_data(&address)
            .await
            .map_err(|e| AnchorError::AnchorSubmitFailed(e.to_string()))?
            .ok_or(AnchorError::ConfigNotFound)?;
        decode_aggregator_config(&data).ok_or(AnchorError::ConfigNotFound)
    }

    async fn fetch_last_seq(&self) -> Result<Option<Seq>, AnchorError> {
        let address = pda::aggregator_state_address(&self.program_id);
        let data = self
            .ledger
            .get_account_data(&address)
            .await
            .map_err(|e| AnchorError::FetchLastSeqFailed(e.to_string()))?;
        match data {
            None => Ok(None),
            Some(bytes) => decode_aggregator_state(&bytes)
                .map(|s| Some(s.last_seq))
                .ok_or_else(|| AnchorError::FetchLastSeqFailed("malformed aggregator state".into())),
        }
    }

    pub async fn anchor(&self, req: AnchorRequest<'_>) -> Result<AnchorOutcome, AnchorError> {
        let config = self.fetch_config().await?;
        if config.chain_id != self.local_chain_id {
            return Err(AnchorError::ChainIdMismatch {
                configured: self.local_chain_id,
                on_chain: config.chain_id,
            });
        }

        let last_seq = self.fetch_last_seq().await?;
        let seq = transaction::next_seq(last_seq);

        let preimage = CommitmentPreimage::build(&CommitmentInputs {
            chain_id: self.local_chain_id,
            program_id: self.program_id,
            proof_hash: req.proof_hash,
            start_slot: req.artifact.start_slot,
            end_slot: req.artifact.end_slot,
            seq,
        });
        let ds_hash = preimage.digest();

        let signature = self
            .signer
            .sign(&preimage, seq, &config)
            .map_err(|_| AnchorError::AggregatorKeyMismatch { seq })?;
        let aggregator_pubkey = self.signer.public_key();

        let payload = AnchorPayload {
            artifact_id: req.artifact_id,
            proof_hash: req.proof_hash,
            seq,
            start_slot: req.artifact.start_slot,
            end_slot: req.artifact.end_slot,
            artifact_len: req.artifact_len,
            state_root_before: req.artifact.state_root_before,
            state_root_after: req.artifact.state_root_after,
            aggregator_pubkey,
            timestamp: Utc::now().timestamp(),
            ds_hash,
        };
        let anchor_call_payload = payload::encode(&payload);

        let accounts = AnchorCallAccounts {
            fee_payer: req.fee_payer,
            configuration: pda::configuration_address(&self.program_id),
            aggregator_state: pda::aggregator_state_address(&self.program_id),
            range_state: pda::range_state_address(&self.program_id),
            proof_record: pda::proof_record_address(&self.program_id, &req.proof_hash, seq),
            instructions_sysvar: INSTRUCTIONS_SYSVAR,
            system_program: SYSTEM_PROGRAM,
        };

        let signature_bytes: [u8; 64] = signature.to_bytes();
        let AnchorTransaction { instructions, .. } = transaction::compose(
            anchor_call_payload,
            &aggregator_pubkey,
            &signature_bytes,
            preimage.as_bytes(),
            accounts,
        );

        let transaction_id = self
            .ledger
            .submit_transaction(&instructions)
            .await
            .map_err(|e| map_submit_error(&e))?;

        Ok(AnchorOutcome {
            transaction_id,
            seq,
            aggregator_signature: signature_bytes,
            ds_hash,
        })
    }
}

/// Well-known sysvar/system addresses on the external ledger. These are
/// fixed constants on the real network; the zeroed placeholders here match
/// this workspace's treatment of the ledger as an abstract collaborator
/// (see `LedgerClient`) rather than a concrete chain.
const INSTRUCTIONS_SYSVAR: LedgerPubkey = LedgerPubkey([0xAA; 32]);
const SYSTEM_PROGRAM: LedgerPubkey = LedgerPubkey([0x00; 32]);

fn decode_aggregator_config(data: &[u8]) -> Option<AggregatorConfig> {
    serde_json::from_slice(data).ok()
}

fn decode_aggregator_state(data: &[u8]) -> Option<AggregatorState> {
    serde_json::from_slice(data).ok()
}

/// Map a ledger submission failure to the verifier-error taxonomy. Anything
/// the verifier-error table doesn't recognize falls back to
/// `AnchorSubmitFailed`, per the spec's canonical error table.
fn map_submit_error(err: &anyhow::Error) -> AnchorError {
    if let Some(rpc_err) = err.downcast_ref::<VerifierRpcError>() {
        if let Some(code) = VerifierErrorCode::match_str_or_code(&rpc_err.message, rpc_err.code) {
            return AnchorError::VerifierRejected(code);
        }
    }
    AnchorError::AnchorSubmitFailed(err.to_string())
}
