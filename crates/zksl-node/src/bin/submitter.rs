//! zksl-submitter — composition root for the submission side.
//!
//! Startup sequence:
//!   1. Load configuration from the environment
//!   2. Load the aggregator signing key
//!   3. Open the artifact store
//!   4. Build the submission orchestrator against either a live ledger RPC
//!      endpoint or, under `LOCAL_MODE`, a process-local synthesized ledger
//!   5. Idle, ready to serve the (out-of-scope) HTTP ingress's calls into
//!      `zksl_node::handlers`
//!
//! There is no HTTP router here — `spec.md` §1 scopes that to an external
//! collaborator. This binary exists so the core crates have a realistic
//! caller; integration tests exercise `zksl_node::handlers` directly as a
//! library rather than spawning this process.

use std::sync::Mutex;

use anyhow::Context;
use tracing::info;

use zksl_core::{Config, LedgerPubkey};
use zksl_node::handlers::AppState;
use zksl_node::{ApiKeyGuard, ArtifactStore, RateLimiter};
use zksl_signer::AggregatorSigner;
use zksl_submit::{IdempotencyCache, JsonRpcLedgerClient, LocalModeLedgerClient, SubmissionOrchestrator};

fn parse_program_id(raw: &str) -> anyhow::Result<LedgerPubkey> {
    let bytes = hex::decode(raw).context("PROGRAM_ID must be hex-encoded")?;
    if bytes.len() != 32 {
        anyhow::bail!("PROGRAM_ID must decode to exactly 32 bytes, got {}", bytes.len());
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(LedgerPubkey(arr))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    info!("zksl-submitter starting");

    let signing_key = zksl_signer::load_signing_key(&config.aggregator_keypair_path)
        .context("loading aggregator keypair")?;
    let signer = AggregatorSigner::new(signing_key);
    info!(public_key = ?signer.public_key(), "aggregator key loaded");

    let artifacts =
        ArtifactStore::new(&config.artifact_dir).context("opening artifact store")?;
    let idempotency = Mutex::new(IdempotencyCache::new(config.idemp_max_entries));
    let _rate_limiter = RateLimiter::new(
        config.ratelimit_max,
        std::time::Duration::from_millis(config.ratelimit_window_ms),
    );
    let _auth_guard = ApiKeyGuard::new(config.api_keys.clone(), false);

    let program_id = parse_program_id(&config.program_id)?;

    if config.local_mode {
        info!("LOCAL_MODE enabled — submitting against a synthesized in-process ledger");
        let aggregator_pubkey = signer.public_key();
        let ledger = LocalModeLedgerClient::seeded(program_id, aggregator_pubkey, config.chain_id);
        let orchestrator = SubmissionOrchestrator::new(ledger, signer, program_id, config.chain_id);
        let _state = AppState {
            artifacts,
            idempotency,
            orchestrator,
            proof_store: None,
        };
        info!("zksl-submitter ready");
        tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    } else {
        let orchestrator = SubmissionOrchestrator::new(
            JsonRpcLedgerClient::new(&config.rpc_url),
            signer,
            program_id,
            config.chain_id,
        );
        let _state = AppState {
            artifacts,
            idempotency,
            orchestrator,
            proof_store: None,
        };
        info!("zksl-submitter ready");
        tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    }

    info!("zksl-submitter shutting down");
    Ok(())
}
