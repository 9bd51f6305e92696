use std::sync::Arc;

use auth::TokenIssuer;

use crate::domain::authentication::errors::GuardError;

/// Bearer-token gate in front of protected operations.
///
/// Only answers "is this a valid, unexpired token"; it does not scope what
/// the holder may do.
pub struct AuthGuard {
    token_issuer: Arc<TokenIssuer>,
}

impl AuthGuard {
    pub fn new(token_issuer: Arc<TokenIssuer>) -> Self {
        Self { token_issuer }
    }

    /// Check the raw `Authorization` header value.
    ///
    /// # Returns
    /// Subject of the presented token
    ///
    /// # Errors
    /// * `MissingAuthHeader` - Header absent or empty
    /// * `MalformedHeader` - Header is not exactly `Bearer <token>`
    /// * `InvalidToken` - Bad signature, wrong algorithm, expired or undecodable
    pub fn authorize(&self, authorization: Option<&str>) -> Result<String, GuardError> {
        let header = authorization
            .filter(|value| !value.is_empty())
            .ok_or(GuardError::MissingAuthHeader)?;

        let token = bearer_token(header)?;

        self.token_issuer
            .validate(token)
            .map_err(GuardError::InvalidToken)
    }
}

fn bearer_token(header: &str) -> Result<&str, GuardError> {
    let mut parts = header.split(' ');

    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(GuardError::MalformedHeader),
    }
}
