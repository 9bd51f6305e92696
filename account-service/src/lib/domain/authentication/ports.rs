use async_trait::async_trait;

use crate::domain::authentication::errors::AuthenticationError;
use crate::domain::authentication::models::AuthResult;
use crate::domain::authentication::models::LoginCommand;

/// Port for credential verification and token issuance.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `command` - Validated username and password
    ///
    /// # Returns
    /// Token and its absolute expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `TokenGeneration` - Token signing failed
    /// * `VerificationFailed` - Password verification task failed
    /// * `DatabaseError` - User lookup failed
    async fn authenticate(&self, command: LoginCommand) -> Result<AuthResult, AuthenticationError>;
}
