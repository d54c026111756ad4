use std::path::Path;

use ed25519_dalek::SigningKey;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("reading keypair file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("keypair file is not one of the accepted formats (64-byte raw array, hex string, or labelled envelope)")]
    UnrecognizedFormat,
    #[error("keypair secret must be exactly 32 bytes, got {0}")]
    WrongSecretLength(usize),
    #[error("hex decoding failed: {0}")]
    Hex(#[from] hex::FromHexError),
}

#[derive(Deserialize)]
struct RawArrayFile(Vec<u8>);

#[derive(Deserialize)]
struct LabelledEnvelope {
    /// Accepts either the 32-byte seed or the 64-byte (seed || pubkey) form,
    /// matching the conventions of the ecosystem's own keypair files.
    secret_key: String,
}

/// Load an Ed25519 signing key from `path`. Three formats are accepted:
///
/// 1. A JSON array of 64 raw secret-key bytes (seed || public key), the
///    convention most ledger CLIs emit for keypair files.
/// 2. A bare hex string (64 or 128 hex characters, matching the two byte
///    widths above).
/// 3. A labelled JSON envelope: `{"secret_key": "<hex>"}`.
///
/// The secret bytes are held in a `Zeroizing` buffer until consumed by
/// `SigningKey::from_bytes`, which itself zeroizes its internal copy on drop.
pub fn load_signing_key(path: &Path) -> Result<SigningKey, KeyLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| KeyLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let trimmed = contents.trim();

    let seed_bytes = if let Ok(RawArrayFile(bytes)) = serde_json::from_str::<RawArrayFile>(trimmed)
    {
        Zeroizing::new(bytes)
    } else if let Ok(envelope) = serde_json::from_str::<LabelledEnvelope>(trimmed) {
        Zeroizing::new(hex::decode(envelope.secret_key.trim())?)
    } else if trimmed.len() == 64 || trimmed.len() == 128 {
        Zeroizing::new(hex::decode(trimmed)?)
    } else {
        return Err(KeyLoadError::UnrecognizedFormat);
    };

    // Accept either the 32-byte seed alone or the 64-byte (seed || pubkey)
    // form; only the first 32 bytes are ever the secret seed.
    let seed: [u8; 32] = match seed_bytes.len() {
        32 => seed_bytes[..32].try_into().unwrap(),
        64 => seed_bytes[..32].try_into().unwrap(),
        other => return Err(KeyLoadError::WrongSecretLength(other)),
    };

    Ok(SigningKey::from_bytes(&seed))
}
