pub mod artifact;
pub mod canonical;
pub mod le;

pub use artifact::{derive_identifier, proof_hash};
pub use canonical::canonicalize;
