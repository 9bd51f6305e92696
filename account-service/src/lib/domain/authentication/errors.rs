use auth::JwtError;
use thiserror::Error;

use crate::user::errors::PasswordError;
use crate::user::errors::UserError;
use crate::user::errors::UsernameError;

/// Login errors.
///
/// An unknown username and a wrong password both surface as
/// `InvalidCredentials` so a caller cannot enumerate accounts.
#[derive(Debug, Clone, Error)]
pub enum AuthenticationError {
    #[error("validation error: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("validation error: {0}")]
    InvalidPassword(#[from] PasswordError),

    #[error("wrong credentials")]
    InvalidCredentials,

    #[error("Token generation failed: {0}")]
    TokenGeneration(#[from] JwtError),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<UserError> for AuthenticationError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUsername(e) => AuthenticationError::InvalidUsername(e),
            UserError::InvalidPassword(e) => AuthenticationError::InvalidPassword(e),
            UserError::DatabaseError(msg) => AuthenticationError::DatabaseError(msg),
            other => AuthenticationError::DatabaseError(other.to_string()),
        }
    }
}

/// Reasons the auth guard rejects a request.
///
/// All of them are reported to the client as unauthorized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("authorization header required")]
    MissingAuthHeader,

    #[error("invalid authorization header format")]
    MalformedHeader,

    #[error("invalid token")]
    InvalidToken(#[source] JwtError),
}
