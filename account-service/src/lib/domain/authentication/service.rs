use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Duration;

use crate::domain::authentication::errors::AuthenticationError;
use crate::domain::authentication::models::AuthResult;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::user::models::Password;
use crate::user::ports::UserRepository;

/// Lifetime of an issued access token.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 15;

/// Verified against when the username is unknown, so both rejection paths
/// pay one Argon2 verification.
const TIMING_EQUALIZER_PASSWORD: &str = "timing-equalizer";

/// Login service.
///
/// Looks the user up, verifies the password against the stored hash and
/// issues a token that expires a fixed lifetime after issuance.
pub struct AuthenticationService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: Arc<PasswordHasher>,
    token_issuer: Arc<TokenIssuer>,
    token_lifetime: Duration,
    unknown_user_hash: Option<String>,
}

impl<UR> AuthenticationService<UR>
where
    UR: UserRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User directory implementation
    /// * `password_hasher` - Shared password hasher
    /// * `token_issuer` - Shared token issuer
    pub fn new(
        repository: Arc<UR>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        let unknown_user_hash = match password_hasher.hash(TIMING_EQUALIZER_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to prepare unknown-user hash");
                None
            }
        };

        Self {
            repository,
            password_hasher,
            token_issuer,
            token_lifetime: Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
            unknown_user_hash,
        }
    }

    pub fn with_token_lifetime(mut self, token_lifetime: Duration) -> Self {
        self.token_lifetime = token_lifetime;
        self
    }

    async fn verify_password(
        &self,
        password: Password,
        password_hash: String,
    ) -> Result<bool, AuthenticationError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &password_hash))
            .await
            .map_err(|e| AuthenticationError::VerificationFailed(e.to_string()))
    }
}

#[async_trait]
impl<UR> AuthenticationServicePort for AuthenticationService<UR>
where
    UR: UserRepository,
{
    async fn authenticate(&self, command: LoginCommand) -> Result<AuthResult, AuthenticationError> {
        let LoginCommand { username, password } = command;

        let user = match self.repository.find_by_username(&username).await? {
            Some(user) => user,
            None => {
                if let Some(hash) = &self.unknown_user_hash {
                    self.verify_password(password, hash.clone()).await?;
                }
                tracing::info!(username = %username, "Login rejected: unknown username");
                return Err(AuthenticationError::InvalidCredentials);
            }
        };

        if !self.verify_password(password, user.password_hash).await? {
            tracing::info!(username = %username, "Login rejected: password mismatch");
            return Err(AuthenticationError::InvalidCredentials);
        }

        let expires_at = self.token_issuer.now() + self.token_lifetime;
        let token = self
            .token_issuer
            .issue(user.username.as_str(), expires_at)
            .map_err(|e| {
                tracing::error!(username = %username, error = %e, "Token signing failed");
                AuthenticationError::TokenGeneration(e)
            })?;

        tracing::info!(
            user_id = %user.id,
            username = %username,
            expires_at = %expires_at,
            "User authenticated"
        );

        Ok(AuthResult { token, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use auth::JwtError;
    use auth::ManualClock;
    use chrono::DateTime;
    use chrono::TimeZone;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::Username;
    use crate::user::errors::UserError;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
        }
    }

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn hasher() -> Arc<PasswordHasher> {
        Arc::new(PasswordHasher::with_cost(1024, 1, 1).unwrap())
    }

    fn stored_user(hasher: &PasswordHasher, username: &str, password: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: hasher.hash(password).unwrap(),
            created_at: start(),
            updated_at: start(),
            deleted_at: None,
        }
    }

    fn login(username: &str, password: &str) -> LoginCommand {
        LoginCommand::new(username.to_string(), password.to_string()).unwrap()
    }

    fn service_with(
        repository: MockTestUserRepository,
        password_hasher: Arc<PasswordHasher>,
    ) -> (AuthenticationService<MockTestUserRepository>, Arc<TokenIssuer>) {
        let clock = Arc::new(ManualClock::new(start()));
        let token_issuer = Arc::new(TokenIssuer::with_clock(SECRET, clock));
        let service = AuthenticationService::new(
            Arc::new(repository),
            password_hasher,
            Arc::clone(&token_issuer),
        );
        (service, token_issuer)
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let password_hasher = hasher();
        let user = stored_user(&password_hasher, "alice", "secret123");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let (service, token_issuer) = service_with(repository, password_hasher);

        let result = service
            .authenticate(login("alice", "secret123"))
            .await
            .expect("authentication failed");

        assert_eq!(result.expires_at, start() + Duration::minutes(15));
        assert_eq!(token_issuer.validate(&result.token), Ok("alice".to_string()));
    }

    #[tokio::test]
    async fn test_authenticate_custom_lifetime() {
        let password_hasher = hasher();
        let user = stored_user(&password_hasher, "alice", "secret123");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let (service, _) = service_with(repository, password_hasher);
        let service = service.with_token_lifetime(Duration::minutes(5));

        let result = service
            .authenticate(login("alice", "secret123"))
            .await
            .expect("authentication failed");

        assert_eq!(result.expires_at, start() + Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_and_unknown_user_are_identical() {
        let password_hasher = hasher();
        let user = stored_user(&password_hasher, "alice", "secret123");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |username| {
                if username.as_str() == "alice" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        let (service, _) = service_with(repository, password_hasher);

        let wrong_password = service
            .authenticate(login("alice", "wrong"))
            .await
            .unwrap_err();
        let unknown_user = service
            .authenticate(login("nobody", "secret123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthenticationError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthenticationError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_username_is_case_sensitive() {
        let password_hasher = hasher();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username.as_str() == "ALICE")
            .times(1)
            .returning(|_| Ok(None));

        let (service, _) = service_with(repository, password_hasher);

        let result = service.authenticate(login("ALICE", "secret123")).await;
        assert!(matches!(
            result.unwrap_err(),
            AuthenticationError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_authenticate_corrupt_stored_hash() {
        let mut user = stored_user(&hasher(), "alice", "secret123");
        user.password_hash = "not-a-phc-string".to_string();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let (service, _) = service_with(repository, hasher());

        let result = service.authenticate(login("alice", "secret123")).await;
        assert!(matches!(
            result.unwrap_err(),
            AuthenticationError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_authenticate_lookup_failure_is_not_a_credential_error() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));

        let (service, _) = service_with(repository, hasher());

        let result = service.authenticate(login("alice", "secret123")).await;
        assert!(matches!(
            result.unwrap_err(),
            AuthenticationError::DatabaseError(_)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_signing_failure() {
        let password_hasher = hasher();
        let user = stored_user(&password_hasher, "alice", "secret123");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthenticationService::new(
            Arc::new(repository),
            password_hasher,
            Arc::new(TokenIssuer::new(b"")),
        );

        let result = service.authenticate(login("alice", "secret123")).await;
        assert!(matches!(
            result.unwrap_err(),
            AuthenticationError::TokenGeneration(JwtError::MissingSecret)
        ));
    }

    #[test]
    fn test_login_command_validation() {
        assert!(matches!(
            LoginCommand::new(String::new(), "secret123".to_string()),
            Err(AuthenticationError::InvalidUsername(_))
        ));
        assert!(matches!(
            LoginCommand::new("alice".to_string(), String::new()),
            Err(AuthenticationError::InvalidPassword(_))
        ));
    }

    #[test]
    fn test_unknown_user_hash_matches_configured_cost() {
        let (service, _) = service_with(MockTestUserRepository::new(), hasher());

        let hash = service
            .unknown_user_hash
            .as_deref()
            .expect("unknown-user hash not prepared");

        assert!(hash.contains("m=1024,t=1,p=1"));
        assert!(!service.password_hasher.verify("secret123", hash));
    }
}
