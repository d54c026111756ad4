//! keygen — generates an Ed25519 aggregator keypair and writes it to disk
//! in the 64-byte raw-array format `zksl_signer::load_signing_key` accepts.
//! Mirrors the teacher's own `chronx-node` keygen utility: a one-shot CLI
//! binary alongside the long-running node processes, not a library entry
//! point.

use std::path::PathBuf;

use clap::Parser;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

#[derive(Parser, Debug)]
#[command(name = "keygen", about = "Generate an aggregator Ed25519 keypair")]
struct Args {
    /// Output path for the keypair file (64-byte raw array JSON).
    #[arg(long, default_value = "aggregator-keypair.json")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let key = SigningKey::generate(&mut OsRng);
    let bytes = key.to_keypair_bytes();
    let json = serde_json::to_string(&bytes.to_vec())?;
    std::fs::write(&args.out, json)?;

    println!("wrote aggregator keypair to {}", args.out.display());
    println!("public key: {}", hex::encode(key.verifying_key().to_bytes()));
    Ok(())
}
