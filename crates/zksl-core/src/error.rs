use thiserror::Error;

/// The canonical error kind used to pick an HTTP status at the (out-of-scope)
/// ingress layer. Every [`AnchorError`] variant maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    MissingIdempotencyKey,
    NotFound,
    ChainIdMismatch,
    AggregatorKeyMismatch,
    ConfigNotFound,
    FetchLastSeqFailed,
    RateLimitExceeded,
    AuthRequired,
    Forbidden,
    VerifierRejected,
    AnchorSubmitFailed,
    PathNotAllowed,
}

impl ErrorKind {
    /// HTTP status code associated with this kind, per the spec's error table.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::BadRequest
            | ErrorKind::MissingIdempotencyKey
            | ErrorKind::ChainIdMismatch
            | ErrorKind::AggregatorKeyMismatch
            | ErrorKind::ConfigNotFound => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::RateLimitExceeded => 429,
            ErrorKind::AuthRequired => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::FetchLastSeqFailed | ErrorKind::AnchorSubmitFailed => 500,
            ErrorKind::PathNotAllowed => 500,
            ErrorKind::VerifierRejected => 400, // overridden per-variant below
        }
    }
}

/// One error returned by a verifier program rejection, mapped from the
/// verifier's error string or numeric code per the canonical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierErrorCode {
    BadEd25519Order,
    BadDomainSeparation,
    NonMonotonicSeq,
    RangeOverlap,
    ClockSkew,
    AggregatorMismatch,
    InvalidMint,
    Paused,
}

impl VerifierErrorCode {
    /// Parse a verifier-returned error string or numeric code into the
    /// canonical taxonomy entry. Returns `None` for anything unrecognized
    /// (the caller should fall back to [`AnchorError::AnchorSubmitFailed`]).
    pub fn match_str_or_code(message: &str, code: Option<i64>) -> Option<Self> {
        let by_code = code.and_then(|c| match c {
            6015 => Some(Self::BadEd25519Order),
            6016 => Some(Self::BadDomainSeparation),
            6012 => Some(Self::NonMonotonicSeq),
            6013 => Some(Self::RangeOverlap),
            6014 => Some(Self::ClockSkew),
            6006 => Some(Self::AggregatorMismatch),
            6000 => Some(Self::InvalidMint),
            6010 => Some(Self::Paused),
            _ => None,
        });
        if by_code.is_some() {
            return by_code;
        }
        match message {
            "BadEd25519Order" => Some(Self::BadEd25519Order),
            "BadDomainSeparation" => Some(Self::BadDomainSeparation),
            "NonMonotonicSeq" => Some(Self::NonMonotonicSeq),
            "RangeOverlap" => Some(Self::RangeOverlap),
            "ClockSkew" => Some(Self::ClockSkew),
            "AggregatorMismatch" => Some(Self::AggregatorMismatch),
            "InvalidMint" => Some(Self::InvalidMint),
            "Paused" => Some(Self::Paused),
            _ => None,
        }
    }

    pub fn http_status(self) -> u16 {
        match self {
            VerifierErrorCode::Paused => 403,
            _ => 400,
        }
    }
}

impl std::fmt::Display for VerifierErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VerifierErrorCode::BadEd25519Order => "BadEd25519Order",
            VerifierErrorCode::BadDomainSeparation => "BadDomainSeparation",
            VerifierErrorCode::NonMonotonicSeq => "NonMonotonicSeq",
            VerifierErrorCode::RangeOverlap => "RangeOverlap",
            VerifierErrorCode::ClockSkew => "ClockSkew",
            VerifierErrorCode::AggregatorMismatch => "AggregatorMismatch",
            VerifierErrorCode::InvalidMint => "InvalidMint",
            VerifierErrorCode::Paused => "Paused",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("missing Idempotency-Key header")]
    MissingIdempotencyKey,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("chain id mismatch: configured {configured}, on-chain {on_chain}")]
    ChainIdMismatch { configured: u64, on_chain: u64 },

    #[error("aggregator key mismatch: locally loaded key does not match the allowed pubkey for seq {seq}")]
    AggregatorKeyMismatch { seq: u64 },

    #[error("configuration record not found on-chain")]
    ConfigNotFound,

    #[error("failed to fetch last sequence number: {0}")]
    FetchLastSeqFailed(String),

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("API key required")]
    AuthRequired,

    #[error("forbidden")]
    Forbidden,

    #[error("verifier rejected the submission: {0}")]
    VerifierRejected(VerifierErrorCode),

    #[error("anchor submission failed: {0}")]
    AnchorSubmitFailed(String),

    #[error("path escapes the allow-listed root: {0}")]
    PathNotAllowed(String),
}

impl AnchorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnchorError::BadRequest(_) => ErrorKind::BadRequest,
            AnchorError::MissingIdempotencyKey => ErrorKind::MissingIdempotencyKey,
            AnchorError::NotFound(_) => ErrorKind::NotFound,
            AnchorError::ChainIdMismatch { .. } => ErrorKind::ChainIdMismatch,
            AnchorError::AggregatorKeyMismatch { .. } => ErrorKind::AggregatorKeyMismatch,
            AnchorError::ConfigNotFound => ErrorKind::ConfigNotFound,
            AnchorError::FetchLastSeqFailed(_) => ErrorKind::FetchLastSeqFailed,
            AnchorError::RateLimitExceeded => ErrorKind::RateLimitExceeded,
            AnchorError::AuthRequired => ErrorKind::AuthRequired,
            AnchorError::Forbidden => ErrorKind::Forbidden,
            AnchorError::VerifierRejected(_) => ErrorKind::VerifierRejected,
            AnchorError::AnchorSubmitFailed(_) => ErrorKind::AnchorSubmitFailed,
            AnchorError::PathNotAllowed(_) => ErrorKind::PathNotAllowed,
        }
    }

    /// HTTP status code this error would surface as at the (out-of-scope) ingress.
    pub fn http_status(&self) -> u16 {
        match self {
            AnchorError::VerifierRejected(code) => code.http_status(),
            other => other.kind().http_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifier_code_matches_by_numeric_code() {
        assert_eq!(
            VerifierErrorCode::match_str_or_code("whatever", Some(6013)),
            Some(VerifierErrorCode::RangeOverlap)
        );
    }

    #[test]
    fn verifier_code_matches_by_string() {
        assert_eq!(
            VerifierErrorCode::match_str_or_code("ClockSkew", None),
            Some(VerifierErrorCode::ClockSkew)
        );
    }

    #[test]
    fn unrecognized_verifier_error_is_none() {
        assert_eq!(VerifierErrorCode::match_str_or_code("WeirdError", Some(1)), None);
    }

    #[test]
    fn paused_maps_to_403() {
        assert_eq!(
            AnchorError::VerifierRejected(VerifierErrorCode::Paused).http_status(),
            403
        );
    }

    #[test]
    fn bad_request_maps_to_400() {
        assert_eq!(AnchorError::BadRequest("x".into()).http_status(), 400);
    }
}
