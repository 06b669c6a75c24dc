//! User account repository port.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;
use async_trait::async_trait;

/// Repository port for user account persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure (including email
    ///   uniqueness violations; callers check availability first)
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find an account by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Persist account changes (guest conversion, deactivation).
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account doesn't exist
    async fn update(&self, user: &User) -> Result<(), DomainError>;
}
