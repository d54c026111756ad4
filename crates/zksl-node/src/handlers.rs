//! Library-level realization of the thin submitter ingress contract
//! (`spec.md` §6): request/response DTOs and handler functions for
//! `/prove`, `/artifact`, `/anchor`, `/proof/:id`, `/validator/:pubkey`, and
//! `/health`. No HTTP router binds these — that layer is an out-of-scope
//! external collaborator (`spec.md` §1) — but the shapes and the error
//! mapping they produce are exactly what such a router would need to wire
//! up, the same way `chronx_rpc::server::RpcServerState` centralizes the
//! dependencies a thin `jsonrpsee` layer dispatches into.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use zksl_core::{AnchorError, Artifact, ArtifactId, Hex32, ProofHash};
use zksl_indexer::{ProofStore, StoreError, ValidatorRow};
use zksl_submit::{CachedResponse, IdempotencyCache, LedgerClient, SubmissionOrchestrator};

use crate::artifact_store::ArtifactStore;

#[derive(Debug, Deserialize)]
pub struct ProveRequestBody {
    pub start_slot: u64,
    pub end_slot: u64,
    pub state_root_before: String,
    pub state_root_after: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProveResponseBody {
    pub artifact_id: String,
    pub proof_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct AnchorRequestBody {
    pub artifact_id: String,
}

#[derive(Debug, Serialize)]
pub struct AnchorResponseBody {
    pub aggregator_signature: String,
    pub ds_hash: String,
    pub transaction_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponseBody {
    pub status: &'static str,
    pub version: &'static str,
}

/// Shared state a real HTTP layer would hold one instance of per process.
pub struct AppState<L: LedgerClient> {
    pub artifacts: ArtifactStore,
    pub idempotency: Mutex<IdempotencyCache>,
    pub orchestrator: SubmissionOrchestrator<L>,
    pub proof_store: Option<ProofStore>,
}

/// Handles `POST /prove` and `POST /artifact` (spec treats them as the same
/// operation): validate, canonicalize, derive the content-addressed
/// identifier, write to the artifact store, and cache the response under
/// `idempotency_key` so repeated calls within the TTL return byte-identical
/// bodies without redoing the work.
pub fn handle_prove<L: LedgerClient>(
    state: &AppState<L>,
    idempotency_key: Option<&str>,
    body: ProveRequestBody,
) -> Result<ProveResponseBody, AnchorError> {
    let key = idempotency_key.ok_or(AnchorError::MissingIdempotencyKey)?;

    {
        let mut cache = state.idempotency.lock().unwrap();
        if let Some(cached) = cache.get(key) {
            return serde_json::from_value(cached.body)
                .map_err(|e| AnchorError::BadRequest(e.to_string()));
        }
    }

    let state_root_before = body
        .state_root_before
        .parse::<Hex32>()
        .map_err(|e| AnchorError::BadRequest(e.to_string()))?;
    let state_root_after = body
        .state_root_after
        .parse::<Hex32>()
        .map_err(|e| AnchorError::BadRequest(e.to_string()))?;

    let artifact = Artifact::new(
        body.start_slot,
        body.end_slot,
        state_root_before,
        state_root_after,
    )
    .map_err(|e| AnchorError::BadRequest(e.to_string()))?;

    let proof_hash = zksl_codec::proof_hash(&artifact);
    let artifact_id = zksl_codec::derive_identifier(&proof_hash);

    let canonical = zksl_codec::canonicalize(&serde_json::json!({
        "start_slot": artifact.start_slot,
        "end_slot": artifact.end_slot,
        "state_root_before": artifact.state_root_before.to_hex(),
        "state_root_after": artifact.state_root_after.to_hex(),
    }));
    state
        .artifacts
        .write(&artifact_id, canonical.as_bytes())
        .map_err(AnchorError::from)?;

    let response = ProveResponseBody {
        artifact_id: artifact_id.to_string(),
        proof_hash: proof_hash.to_hex(),
    };

    let mut cache = state.idempotency.lock().unwrap();
    cache.put(
        key.to_string(),
        CachedResponse {
            status: 200,
            body: serde_json::to_value(&response).expect("ProveResponseBody always serializes"),
        },
    );

    Ok(response)
}

/// Handles `POST /anchor`: load the artifact previously written by
/// `/prove`, recompute its proof-hash, and drive the submission
/// orchestrator end to end.
pub async fn handle_anchor<L: LedgerClient>(
    state: &AppState<L>,
    fee_payer: zksl_core::LedgerPubkey,
    body: AnchorRequestBody,
) -> Result<AnchorResponseBody, AnchorError> {
    let artifact_id: ArtifactId = body
        .artifact_id
        .parse::<uuid::Uuid>()
        .map(ArtifactId::from_uuid)
        .map_err(|e| AnchorError::BadRequest(e.to_string()))?;

    let canonical = state
        .artifacts
        .read(&artifact_id)
        .map_err(AnchorError::from)?
        .ok_or_else(|| AnchorError::NotFound(artifact_id.to_string()))?;

    let value: serde_json::Value =
        serde_json::from_slice(&canonical).map_err(|e| AnchorError::BadRequest(e.to_string()))?;
    let start_slot = value["start_slot"].as_u64().ok_or_else(|| {
        AnchorError::BadRequest("stored artifact missing start_slot".to_string())
    })?;
    let end_slot = value["end_slot"]
        .as_u64()
        .ok_or_else(|| AnchorError::BadRequest("stored artifact missing end_slot".to_string()))?;
    let state_root_before: Hex32 = value["state_root_before"]
        .as_str()
        .ok_or_else(|| AnchorError::BadRequest("stored artifact missing state_root_before".to_string()))?
        .parse()
        .map_err(|e: zksl_core::HexDecodeError| AnchorError::BadRequest(e.to_string()))?;
    let state_root_after: Hex32 = value["state_root_after"]
        .as_str()
        .ok_or_else(|| AnchorError::BadRequest("stored artifact missing state_root_after".to_string()))?
        .parse()
        .map_err(|e: zksl_core::HexDecodeError| AnchorError::BadRequest(e.to_string()))?;

    let artifact = Artifact::new(start_slot, end_slot, state_root_before, state_root_after)
        .map_err(|e| AnchorError::BadRequest(e.to_string()))?;
    let proof_hash: ProofHash = zksl_codec::proof_hash(&artifact);

    let request = zksl_submit::AnchorRequest {
        artifact: &artifact,
        artifact_id,
        proof_hash,
        artifact_len: canonical.len() as u32,
        fee_payer,
    };

    let outcome = state.orchestrator.anchor(request).await?;

    Ok(AnchorResponseBody {
        aggregator_signature: hex::encode(outcome.aggregator_signature),
        ds_hash: hex::encode(outcome.ds_hash),
        transaction_id: outcome.transaction_id,
    })
}

#[derive(Debug, Serialize)]
pub struct ProofQueryResponse {
    pub artifact: serde_json::Value,
    pub status: Option<ProofStatus>,
}

#[derive(Debug, Serialize)]
pub struct ProofStatus {
    pub seq: i64,
    pub commitment_level: i16,
    pub txid: Option<String>,
}

/// Handles `GET /proof/:id`: the stored artifact plus, if the indexer has
/// seen it, its anchoring status.
pub async fn handle_get_proof<L: LedgerClient>(
    state: &AppState<L>,
    artifact_id: &str,
) -> Result<ProofQueryResponse, AnchorError> {
    let id = artifact_id
        .parse::<uuid::Uuid>()
        .map(ArtifactId::from_uuid)
        .map_err(|e| AnchorError::BadRequest(e.to_string()))?;

    let canonical = state
        .artifacts
        .read(&id)
        .map_err(AnchorError::from)?
        .ok_or_else(|| AnchorError::NotFound(id.to_string()))?;
    let artifact: serde_json::Value =
        serde_json::from_slice(&canonical).map_err(|e| AnchorError::BadRequest(e.to_string()))?;

    let status = match &state.proof_store {
        Some(store) => lookup_status(store, &id).await.map_err(|e: StoreError| {
            AnchorError::AnchorSubmitFailed(e.to_string())
        })?,
        None => None,
    };

    Ok(ProofQueryResponse { artifact, status })
}

async fn lookup_status(
    store: &ProofStore,
    id: &ArtifactId,
) -> Result<Option<ProofStatus>, StoreError> {
    Ok(store.get_proof(id.0).await?.map(|r| ProofStatus {
        seq: r.seq,
        commitment_level: r.commitment_level,
        txid: r.txid,
    }))
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ValidatorResponseBody {
    pub pubkey: String,
    pub status: String,
    pub escrow: String,
    pub num_accepts: i64,
}

impl From<ValidatorRow> for ValidatorResponseBody {
    fn from(row: ValidatorRow) -> Self {
        Self {
            pubkey: row.pubkey,
            status: row.status,
            escrow: row.escrow,
            num_accepts: row.num_accepts,
        }
    }
}

/// Handles `GET /validator/:pubkey`: the indexer's last-reconciled view of
/// one registered validator, or `NotFound` if the indexer has never seen it.
///
/// Requires a live `proof_store` — unlike `/proof/:id`, there is no
/// filesystem fallback, since validator records originate entirely from
/// the ledger rather than from a prior submitter-side write.
pub async fn handle_get_validator<L: LedgerClient>(
    state: &AppState<L>,
    pubkey_hex: &str,
) -> Result<ValidatorResponseBody, AnchorError> {
    let store = state
        .proof_store
        .as_ref()
        .ok_or_else(|| AnchorError::NotFound(pubkey_hex.to_string()))?;

    store
        .get_validator(&pubkey_hex.to_ascii_lowercase())
        .await
        .map_err(|e: StoreError| AnchorError::AnchorSubmitFailed(e.to_string()))?
        .map(ValidatorResponseBody::from)
        .ok_or_else(|| AnchorError::NotFound(pubkey_hex.to_string()))
}

pub fn handle_health() -> HealthResponseBody {
    HealthResponseBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }
}
