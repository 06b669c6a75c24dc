//! RegisterUserHandler - account registration.

use std::sync::Arc;

use crate::domain::foundation::{AuthError, UserId};
use crate::domain::user::User;
use crate::ports::{PasswordHasher, UserRepository};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub email: String,
    pub password: String,
}

/// Handler for account registration.
pub struct RegisterUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegisterUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(&self, cmd: RegisterUserCommand) -> Result<User, AuthError> {
        if cmd.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }

        if self.users.find_by_email(&cmd.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let hash = self.hasher.hash(&cmd.password)?;
        let user = User::register(UserId::new(), cmd.email, hash)?;
        self.users.create(&user).await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{InMemoryUserRepository, PlainHasher};

    fn handler(repo: Arc<InMemoryUserRepository>) -> RegisterUserHandler {
        RegisterUserHandler::new(repo, Arc::new(PlainHasher))
    }

    #[tokio::test]
    async fn registers_user_with_hashed_password() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = handler(repo.clone())
            .handle(RegisterUserCommand {
                email: "a@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();

        let stored = repo.get(user.id()).unwrap();
        assert_eq!(stored.password_hash(), "hashed:hunter2hunter2");
        assert!(!stored.is_guest());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let h = handler(repo);
        let cmd = RegisterUserCommand {
            email: "a@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        };
        h.handle(cmd.clone()).await.unwrap();

        let result = h.handle(cmd).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyRegistered)));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let result = handler(Arc::new(InMemoryUserRepository::new()))
            .handle(RegisterUserCommand {
                email: "a@example.com".to_string(),
                password: "short".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::WeakPassword)));
    }
}
