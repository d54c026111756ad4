//! zksl-indexer — composition root for the indexing / reconciliation side.
//!
//! Runs the streaming and polling disciplines on one task, serialized
//! behind a single `tokio::select!` loop, directly encoding the
//! single-threaded-cooperative ordering guarantee from `spec.md` §5 rather
//! than leaving two independently scheduled tasks to be accidentally
//! well-behaved: a 20s interval drives polling + reconciliation, and a
//! bounded channel (standing in for the external ledger's account-change
//! subscription) drives the streaming upserts.

use anyhow::Context;
use tracing::{info, warn};

use zksl_core::{Config, LedgerPubkey};
use zksl_indexer::{run_poll_cycle, run_reconciliation_cycle, ProofStore, POLL_INTERVAL_SECS};
use zksl_submit::{JsonRpcLedgerClient, LedgerClient, LocalModeLedgerClient};

fn parse_program_id(raw: &str) -> anyhow::Result<LedgerPubkey> {
    let bytes = hex::decode(raw).context("PROGRAM_ID must be hex-encoded")?;
    if bytes.len() != 32 {
        anyhow::bail!("PROGRAM_ID must decode to exactly 32 bytes, got {}", bytes.len());
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(LedgerPubkey(arr))
}

async fn run_loops<L: LedgerClient>(
    store: ProofStore,
    ledger: L,
    program_id: LedgerPubkey,
    mut account_changes: tokio::sync::mpsc::Receiver<Vec<u8>>,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(POLL_INTERVAL_SECS));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_poll_cycle(&store, &ledger, &program_id).await {
                    warn!(error = %e, "poll cycle failed");
                }
                if let Err(e) = run_reconciliation_cycle(&store, &ledger).await {
                    warn!(error = %e, "reconciliation cycle failed");
                }
            }
            maybe_change = account_changes.recv() => {
                match maybe_change {
                    Some(data) => {
                        if let Err(e) = zksl_indexer::handle_account_change(&store, &data).await {
                            warn!(error = %e, "streaming account-change handling failed");
                        }
                    }
                    None => {
                        info!("account-change stream closed, continuing on polling alone");
                    }
                }
            }
        }
    }
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

    info!("zksl-indexer starting");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("connecting to database")?;
    let store = ProofStore::new(pool);
    store.bootstrap().await.context("bootstrapping schema")?;

    let program_id = parse_program_id(&config.program_id)?;

    // Standing in for the external ledger's account-change subscription
    // (spec.md §4.5's streaming path); nothing publishes to it yet since
    // that transport is out of scope, but the select loop is wired to
    // consume it the moment one is plugged in.
    let (_account_change_tx, account_change_rx) = tokio::sync::mpsc::channel(256);

    info!("zksl-indexer ready");

    if config.local_mode {
        run_loops(store, LocalModeLedgerClient::new(), program_id, account_change_rx).await
    } else {
        run_loops(
            store,
            JsonRpcLedgerClient::new(&config.rpc_url),
            program_id,
            account_change_rx,
        )
        .await
    }
}
