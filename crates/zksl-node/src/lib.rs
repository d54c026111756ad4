//! Composition root for the zKSL anchor service. Wires the core crates
//! (`zksl-codec`, `zksl-commitment`, `zksl-signer`, `zksl-submit`,
//! `zksl-indexer`) into the two long-running processes described by the
//! spec — submitter and indexer — without implementing the out-of-scope
//! HTTP transport itself. See `handlers` for the library-level realization
//! of the submitter's ingress contract, which a real HTTP router would call
//! into.

pub mod artifact_store;
pub mod authguard;
pub mod handlers;
pub mod ratelimit;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use authguard::ApiKeyGuard;
pub use ratelimit::RateLimiter;
