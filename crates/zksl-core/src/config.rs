use std::path::PathBuf;

use thiserror::Error;

/// Minimum finality grade the indexer will treat as "settled" for read-side
/// consumers that only care about durable commitments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinFinalityCommitment {
    Processed,
    Confirmed,
    Finalized,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, loaded from the environment variables enumerated
/// in the spec. Unrecognized variables are ignored; recognized ones are
/// validated eagerly so a misconfigured process fails at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: String,
    pub program_id: String,
    pub chain_id: u64,
    pub aggregator_keypair_path: PathBuf,
    pub artifact_dir: PathBuf,
    pub database_url: String,
    pub min_finality_commitment: MinFinalityCommitment,
    pub local_mode: bool,
    pub api_keys: Vec<String>,
    pub ratelimit_max: u32,
    pub ratelimit_window_ms: u64,
    pub idemp_max_entries: usize,
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// This is the library-level equivalent of the teacher's `clap::Parser`
    /// startup args: it centralizes every setting the spec recognizes in one
    /// validated struct instead of scattering `env::var` calls across
    /// call sites.
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = require("RPC_URL")?;
        let program_id = require("PROGRAM_ID")?;
        let chain_id = parse_env("CHAIN_ID", require("CHAIN_ID")?)?;
        let aggregator_keypair_path = PathBuf::from(require("AGGREGATOR_KEYPAIR_PATH")?);
        let artifact_dir = PathBuf::from(require("ARTIFACT_DIR")?);
        let database_url = require("DATABASE_URL")?;

        let min_finality_commitment = match std::env::var("MIN_FINALITY_COMMITMENT")
            .unwrap_or_else(|_| "finalized".to_string())
            .as_str()
        {
            "processed" => MinFinalityCommitment::Processed,
            "confirmed" => MinFinalityCommitment::Confirmed,
            "finalized" => MinFinalityCommitment::Finalized,
            other => {
                return Err(ConfigError::Invalid {
                    name: "MIN_FINALITY_COMMITMENT",
                    value: other.to_string(),
                })
            }
        };

        let local_mode = std::env::var("LOCAL_MODE").is_ok();

        let api_keys = std::env::var("API_KEYS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let ratelimit_max = parse_env_opt("RATELIMIT_MAX", 60)?;
        let ratelimit_window_ms = parse_env_opt("RATELIMIT_WINDOW_MS", 60_000)?;
        let idemp_max_entries = parse_env_opt("IDEMP_MAX_ENTRIES", 10_000usize)?;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            rpc_url,
            program_id,
            chain_id,
            aggregator_keypair_path,
            artifact_dir,
            database_url,
            min_finality_commitment,
            local_mode,
            api_keys,
            ratelimit_max,
            ratelimit_window_ms,
            idemp_max_entries,
            log_level,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_env<T: std::str::FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

fn parse_env_opt<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => parse_env(name, raw),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn set_required_vars() {
        std::env::set_var("RPC_URL", "http://localhost:8899");
        std::env::set_var("PROGRAM_ID", "11111111111111111111111111111111");
        std::env::set_var("CHAIN_ID", "1");
        std::env::set_var("AGGREGATOR_KEYPAIR_PATH", "/tmp/agg.json");
        std::env::set_var("ARTIFACT_DIR", "/tmp/artifacts");
        std::env::set_var("DATABASE_URL", "postgres://localhost/zksl");
    }

    #[test]
    fn loads_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        set_required_vars();
        std::env::remove_var("MIN_FINALITY_COMMITMENT");
        std::env::remove_var("LOCAL_MODE");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.chain_id, 1);
        assert_eq!(cfg.ratelimit_max, 60);
        assert_eq!(
            cfg.min_finality_commitment,
            MinFinalityCommitment::Finalized
        );
        assert!(!cfg.local_mode);
    }

    #[test]
    fn rejects_invalid_min_finality_commitment() {
        let _guard = ENV_LOCK.lock().unwrap();
        set_required_vars();
        std::env::set_var("MIN_FINALITY_COMMITMENT", "bogus");
        assert!(Config::from_env().is_err());
        std::env::remove_var("MIN_FINALITY_COMMITMENT");
    }
}
