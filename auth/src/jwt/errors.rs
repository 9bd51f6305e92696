use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token algorithm does not match the expected algorithm")]
    AlgorithmMismatch,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
