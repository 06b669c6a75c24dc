//! LoginUserHandler - email/password login issuing a bearer token.

use std::sync::Arc;

use crate::domain::foundation::AuthError;
use crate::domain::user::User;
use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

/// Command to authenticate with email and password.
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
    pub email: String,
    pub password: String,
}

/// Successful login: the account plus a fresh token.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub access_token: String,
}

/// Handler for logins.
pub struct LoginUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl LoginUserHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
        }
    }

    pub async fn handle(&self, cmd: LoginUserCommand) -> Result<LoginResult, AuthError> {
        // One failure answer for unknown email and wrong password: no
        // account-existence oracle.
        let user = self
            .users
            .find_by_email(&cmd.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(&cmd.password, user.password_hash())? {
            return Err(AuthError::InvalidCredentials);
        }
        user.ensure_active()?;

        let access_token = self.issuer.issue(&user)?;
        Ok(LoginResult { user, access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{InMemoryUserRepository, PlainHasher, StaticIssuer};
    use crate::domain::foundation::{Timestamp, UserId};

    fn handler(repo: Arc<InMemoryUserRepository>) -> LoginUserHandler {
        LoginUserHandler::new(repo, Arc::new(PlainHasher), Arc::new(StaticIssuer))
    }

    fn account(email: &str, password: &str) -> User {
        User::register(
            UserId::new(),
            email.to_string(),
            format!("hashed:{}", password),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_credentials_issue_token() {
        let user = account("a@example.com", "hunter2hunter2");
        let expected_token = format!("token-for-{}", user.id());
        let repo = Arc::new(InMemoryUserRepository::with(vec![user]));

        let result = handler(repo)
            .handle(LoginUserCommand {
                email: "a@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.access_token, expected_token);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let repo = Arc::new(InMemoryUserRepository::with(vec![account(
            "a@example.com",
            "hunter2hunter2",
        )]));

        let result = handler(repo)
            .handle(LoginUserCommand {
                email: "a@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let result = handler(Arc::new(InMemoryUserRepository::new()))
            .handle(LoginUserCommand {
                email: "ghost@example.com".to_string(),
                password: "whatever-long".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn inactive_account_is_rejected() {
        let user = User::reconstitute(
            UserId::new(),
            "a@example.com".to_string(),
            "hashed:hunter2hunter2".to_string(),
            Timestamp::now(),
            false,
            false,
            None,
        );
        let repo = Arc::new(InMemoryUserRepository::with(vec![user]));

        let result = handler(repo)
            .handle(LoginUserCommand {
                email: "a@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::Inactive)));
    }
}
