use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Issues and validates signed, time-limited bearer tokens.
///
/// Tokens are HS256 JWTs over [`Claims`]. Nothing is stored server side:
/// a token is valid exactly when its signature verifies under the shared
/// secret, its header advertises HS256, and the clock has not yet reached
/// its `exp`.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    has_secret: bool,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer reading time from the system clock.
    ///
    /// # Arguments
    /// * `secret` - Shared signing secret (should be at least 32 bytes)
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create an issuer reading time from the given clock.
    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            has_secret: !secret.is_empty(),
            clock,
        }
    }

    /// Current time as seen by this issuer.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Sign a token for `subject` that expires at `expires_at`.
    ///
    /// # Errors
    /// * `MissingSecret` - The issuer was built with an empty secret
    /// * `SigningFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, expires_at: DateTime<Utc>) -> Result<String, JwtError> {
        if !self.has_secret {
            return Err(JwtError::MissingSecret);
        }

        let claims = Claims::new(subject, self.clock.now(), expires_at);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// # Errors
    /// * `AlgorithmMismatch` - Header names an algorithm other than HS256
    /// * `InvalidSignature` - Signature does not verify under the secret
    /// * `TokenExpired` - Current time is at or past `exp`
    /// * `Malformed` - Token cannot be decoded or lacks required claims
    pub fn validate(&self, token: &str) -> Result<String, JwtError> {
        let claims = self.decode(token)?;

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims.sub)
    }

    fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the injected clock, without leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => JwtError::AlgorithmMismatch,
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::Malformed(e.to_string()),
            })
    }
}
