use thiserror::Error;

/// Reasons a token could not be issued or accepted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token algorithm is not accepted")]
    UnsupportedAlgorithm,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}
