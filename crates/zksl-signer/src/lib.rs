pub mod keyfile;
pub mod signer;

pub use keyfile::{load_signing_key, KeyLoadError};
pub use signer::{verify, AggregatorSigner, SigningError};
