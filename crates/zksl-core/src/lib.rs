pub mod config;
pub mod error;
pub mod onchain;
pub mod types;

pub use config::Config;
pub use error::{AnchorError, ErrorKind, VerifierErrorCode};
pub use onchain::{AggregatorConfig, AggregatorState, RangeState};
pub use types::*;
