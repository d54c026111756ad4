//! End-to-end scenario tests exercising `zksl-node` as a library, wiring
//! together the orchestrator, signer, and artifact store the way the
//! (out-of-scope) HTTP ingress would. No process is spawned — see
//! `SPEC_FULL.md` §8 for why: the submitter's transport layer is an
//! external collaborator this workspace never implements.

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

use zksl_core::{AggregatorConfig, AnchorError, LedgerPubkey};
use zksl_signer::AggregatorSigner;
use zksl_submit::{LedgerClient, OwnedAccount, SignatureStatus, SubmissionOrchestrator};

/// A ledger stub that always reports a fixed on-chain configuration, so
/// tests can exercise the chain-id check without a real ledger node.
struct FixedConfigLedger {
    config: AggregatorConfig,
}

#[async_trait]
impl LedgerClient for FixedConfigLedger {
    async fn submit_transaction(&self, _instructions: &[Vec<u8>]) -> anyhow::Result<String> {
        Ok("TESTNET-TX".to_string())
    }

    async fn get_account_data(&self, _address: &LedgerPubkey) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(Some(serde_json::to_vec(&self.config)?))
    }

    async fn get_program_accounts(
        &self,
        _program_id: &LedgerPubkey,
    ) -> anyhow::Result<Vec<OwnedAccount>> {
        Ok(Vec::new())
    }

    async fn earliest_signature_for_address(
        &self,
        _address: &LedgerPubkey,
    ) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    async fn get_signature_status(
        &self,
        _signature: &str,
    ) -> anyhow::Result<Option<SignatureStatus>> {
        Ok(None)
    }
}

fn artifact() -> zksl_core::Artifact {
    zksl_core::Artifact::new(
        1,
        1,
        zksl_core::Hex32::from_bytes([0u8; 32]),
        zksl_core::Hex32::from_bytes([0u8; 32]),
    )
    .unwrap()
}

/// S5: the on-chain configuration's `chain_id` (1) differs from the
/// locally configured one (2) — `/anchor` must fail with
/// `ChainIdMismatch` before any transaction is submitted.
#[tokio::test]
async fn s5_chain_id_mismatch_rejected_before_submission() {
    let key = SigningKey::generate(&mut OsRng);
    let pubkey = LedgerPubkey(key.verifying_key().to_bytes());
    let signer = AggregatorSigner::new(key);

    let on_chain_config = AggregatorConfig {
        aggregator_pubkey: pubkey,
        next_aggregator_pubkey: pubkey,
        activation_seq: 1000,
        chain_id: 1,
    };

    let ledger = FixedConfigLedger {
        config: on_chain_config,
    };

    let program_id = LedgerPubkey([9u8; 32]);
    let local_chain_id = 2;
    let orchestrator = SubmissionOrchestrator::new(ledger, signer, program_id, local_chain_id);

    let artifact = artifact();
    let proof_hash = zksl_codec::proof_hash(&artifact);
    let artifact_id = zksl_codec::derive_identifier(&proof_hash);

    let request = zksl_submit::AnchorRequest {
        artifact: &artifact,
        artifact_id,
        proof_hash,
        artifact_len: 64,
        fee_payer: pubkey,
    };

    let err = orchestrator.anchor(request).await.unwrap_err();
    assert!(matches!(
        err,
        AnchorError::ChainIdMismatch {
            configured: 2,
            on_chain: 1
        }
    ));
}

/// S1/S2-adjacent: the same artifact anchored twice against a matching
/// chain id succeeds both times (seq advances because the ledger reports
/// no `aggregator_state` record, so `next_seq` always reads 1 here — this
/// test only asserts the chain-id check passes and a transaction id comes
/// back, not sequencing, which `zksl-submit`'s own tests cover).
#[tokio::test]
async fn matching_chain_id_allows_submission() {
    let key = SigningKey::generate(&mut OsRng);
    let pubkey = LedgerPubkey(key.verifying_key().to_bytes());
    let signer = AggregatorSigner::new(key);

    let on_chain_config = AggregatorConfig {
        aggregator_pubkey: pubkey,
        next_aggregator_pubkey: pubkey,
        activation_seq: 1000,
        chain_id: 7,
    };
    let ledger = FixedConfigLedger {
        config: on_chain_config,
    };

    let orchestrator = SubmissionOrchestrator::new(ledger, signer, LedgerPubkey([1u8; 32]), 7);
    let artifact = artifact();
    let proof_hash = zksl_codec::proof_hash(&artifact);
    let artifact_id = zksl_codec::derive_identifier(&proof_hash);

    let request = zksl_submit::AnchorRequest {
        artifact: &artifact,
        artifact_id,
        proof_hash,
        artifact_len: 64,
        fee_payer: pubkey,
    };

    let outcome = orchestrator.anchor(request).await.unwrap();
    assert_eq!(outcome.transaction_id, "TESTNET-TX");
    assert_eq!(outcome.seq, 1);
}
