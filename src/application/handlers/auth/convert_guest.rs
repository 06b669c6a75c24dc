//! ConvertGuestHandler - upgrade a guest account to a registered one.
//!
//! The account keeps its id, so every decision, roll, and history row
//! stays attached through the conversion.

use std::sync::Arc;

use crate::domain::foundation::{AuthError, UserId};
use crate::domain::user::User;
use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

use super::register_user::MIN_PASSWORD_LENGTH;

/// Command to convert the calling guest into a registered account.
#[derive(Debug, Clone)]
pub struct ConvertGuestCommand {
    pub user_id: UserId,
    pub email: String,
    pub password: String,
}

/// Successful conversion: the account plus a token minted for the new
/// identity.
#[derive(Debug, Clone)]
pub struct ConvertGuestResult {
    pub user: User,
    pub access_token: String,
}

/// Handler for guest conversion.
pub struct ConvertGuestHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl ConvertGuestHandler {
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

    pub async fn handle(&self, cmd: ConvertGuestCommand) -> Result<ConvertGuestResult, AuthError> {
        if cmd.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }

        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if self.users.find_by_email(&cmd.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let hash = self.hasher.hash(&cmd.password)?;
        user.convert_to_registered(cmd.email, hash)?;
        self.users.update(&user).await?;

        let access_token = self.issuer.issue(&user)?;
        Ok(ConvertGuestResult { user, access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{InMemoryUserRepository, PlainHasher, StaticIssuer};

    fn handler(repo: Arc<InMemoryUserRepository>) -> ConvertGuestHandler {
        ConvertGuestHandler::new(repo, Arc::new(PlainHasher), Arc::new(StaticIssuer))
    }

    #[tokio::test]
    async fn converts_guest_keeping_account_id() {
        let guest = User::guest(UserId::new(), "tok".to_string());
        let guest_id = *guest.id();
        let repo = Arc::new(InMemoryUserRepository::with(vec![guest]));

        let result = handler(repo.clone())
            .handle(ConvertGuestCommand {
                user_id: guest_id,
                email: "real@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.user.id(), &guest_id);
        assert!(!result.user.is_guest());
        let stored = repo.get(&guest_id).unwrap();
        assert_eq!(stored.email(), "real@example.com");
        assert!(stored.guest_token().is_none());
    }

    #[tokio::test]
    async fn registered_account_cannot_convert() {
        let user = User::register(
            UserId::new(),
            "a@example.com".to_string(),
            "hash".to_string(),
        )
        .unwrap();
        let user_id = *user.id();
        let repo = Arc::new(InMemoryUserRepository::with(vec![user]));

        let result = handler(repo)
            .handle(ConvertGuestCommand {
                user_id,
                email: "b@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::NotAGuest)));
    }

    #[tokio::test]
    async fn taken_email_is_rejected() {
        let existing = User::register(
            UserId::new(),
            "taken@example.com".to_string(),
            "hash".to_string(),
        )
        .unwrap();
        let guest = User::guest(UserId::new(), "tok".to_string());
        let guest_id = *guest.id();
        let repo = Arc::new(InMemoryUserRepository::with(vec![existing, guest]));

        let result = handler(repo)
            .handle(ConvertGuestCommand {
                user_id: guest_id,
                email: "taken@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::EmailAlreadyRegistered)));
    }
}
