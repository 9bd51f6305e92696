use chrono::DateTime;
use chrono::Utc;

use crate::domain::authentication::errors::AuthenticationError;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;

/// Command to log in with domain types
#[derive(Debug)]
pub struct LoginCommand {
    pub username: Username,
    pub password: Password,
}

impl LoginCommand {
    /// Validate raw login input.
    ///
    /// # Errors
    /// * `InvalidUsername` - Username missing, blank or too long
    /// * `InvalidPassword` - Password missing or blank
    pub fn new(username: String, password: String) -> Result<Self, AuthenticationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// Signed bearer token
    pub token: String,
    /// Absolute expiry embedded in the token
    pub expires_at: DateTime<Utc>,
}
