use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::Utc;

use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::RegistrationServicePort;
use crate::user::ports::UserRepository;

/// Registration service.
///
/// Checks uniqueness, hashes the password and persists the user. The
/// existence check is advisory; the store's unique index is what actually
/// prevents two concurrent registrations of the same name.
pub struct RegistrationService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: Arc<PasswordHasher>,
}

impl<UR> RegistrationService<UR>
where
    UR: UserRepository,
{
    /// Create a new registration service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User directory implementation
    /// * `password_hasher` - Shared password hasher
    pub fn new(repository: Arc<UR>, password_hasher: Arc<PasswordHasher>) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|e| UserError::HashingFailed(e.to_string()))?
            .map_err(|e| UserError::HashingFailed(e.to_string()))
    }
}

#[async_trait]
impl<UR> RegistrationServicePort for RegistrationService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<UserProfile, UserError> {
        let RegisterUserCommand { username, password } = command;

        if self.repository.exists_by_username(&username).await? {
            tracing::info!(username = %username, "Registration rejected: username taken");
            return Err(UserError::UsernameAlreadyExists(username.to_string()));
        }

        let password_hash = self.hash_password(password).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username,
            password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(UserProfile::from(created_user))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
        }
    }

    fn hasher() -> Arc<PasswordHasher> {
        Arc::new(PasswordHasher::with_cost(1024, 1, 1).unwrap())
    }

    fn command(username: &str, password: &str) -> RegisterUserCommand {
        RegisterUserCommand::new(username.to_string(), password.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(|_| Ok(false));

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice"
                    && user.password_hash.starts_with("$argon2id$")
                    && !user.password_hash.contains("secret123")
                    && user.deleted_at.is_none()
            })
            .times(1)
            .returning(|user| Ok(user));

        let password_hasher = hasher();
        let service = RegistrationService::new(Arc::new(repository), Arc::clone(&password_hasher));

        let profile = service
            .register(command("alice", "secret123"))
            .await
            .expect("registration failed");

        assert_eq!(profile.username.as_str(), "alice");
        assert_eq!(profile.created_at, profile.updated_at);
    }

    #[tokio::test]
    async fn test_register_stores_verifiable_hash() {
        let mut repository = MockTestUserRepository::new();
        let password_hasher = hasher();
        let verifier = Arc::clone(&password_hasher);

        repository
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repository
            .expect_create()
            .withf(move |user| verifier.verify("secret123", &user.password_hash))
            .times(1)
            .returning(|user| Ok(user));

        let service = RegistrationService::new(Arc::new(repository), password_hasher);

        assert!(service.register(command("alice", "secret123")).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_create().times(0);

        let service = RegistrationService::new(Arc::new(repository), hasher());

        let result = service.register(command("alice", "secret123")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(name) if name == "alice"
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_detected_by_store() {
        let mut repository = MockTestUserRepository::new();

        // Lost the race: the check passed but the unique index fired.
        repository
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repository.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = RegistrationService::new(Arc::new(repository), hasher());

        let result = service.register(command("alice", "secret123")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_existence_check_failure() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));
        repository.expect_create().times(0);

        let service = RegistrationService::new(Arc::new(repository), hasher());

        let result = service.register(command("alice", "secret123")).await;
        assert!(matches!(result.unwrap_err(), UserError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_register_storage_failure_is_not_retried() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("disk full".to_string())));

        let service = RegistrationService::new(Arc::new(repository), hasher());

        let result = service.register(command("alice", "secret123")).await;
        assert!(matches!(result.unwrap_err(), UserError::DatabaseError(_)));
    }
}
