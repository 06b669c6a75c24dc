//! Session validation port.
//!
//! Keeps the HTTP middleware provider-agnostic: whether tokens are
//! HS256 JWTs (production) or canned values (tests), the middleware
//! doesn't change.

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use async_trait::async_trait;

/// Validates a bearer token and returns the authenticated user.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a token string.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` on bad signature or structure
    /// - `TokenExpired` when the expiry claim is in the past
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Issues tokens for authenticated accounts.
///
/// Synchronous: signing is pure CPU work.
pub trait TokenIssuer: Send + Sync {
    /// Issue a bearer token for the given account.
    fn issue(&self, user: &crate::domain::user::User) -> Result<String, AuthError>;
}

/// Hashes and verifies account passwords.
///
/// Synchronous; callers needing to keep an executor responsive can wrap
/// calls in `spawn_blocking`.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}
