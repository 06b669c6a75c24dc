//! Authentication types for the domain layer.
//!
//! These types represent an authenticated caller extracted from a JWT
//! token. They have no provider dependencies: the `SessionValidator` port
//! populates them, whether the token came from a registered login or a
//! guest session.

use super::{DomainError, UserId};
use thiserror::Error;

/// Authenticated user extracted from a validated JWT.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The account identifier the token was issued for.
    pub id: UserId,

    /// Email address from the token claims. Guest accounts carry a
    /// placeholder address until converted.
    pub email: String,

    /// Whether this is an unconverted guest session.
    pub is_guest: bool,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    ///
    /// Typically called by the `SessionValidator` adapter after
    /// successfully validating a token.
    pub fn new(id: UserId, email: impl Into<String>, is_guest: bool) -> Self {
        Self {
            id,
            email: email.into(),
            is_guest,
        }
    }
}

/// Authentication and account errors.
///
/// These are domain-centric: they describe what went wrong from the
/// application's perspective, not the token library's.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Token signature or structure is invalid.
    #[error("Invalid token")]
    InvalidToken,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Email/password pair did not match an account.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Registration or conversion target email is already taken.
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    /// Guest-only operation attempted on a registered account.
    #[error("User is not a guest")]
    NotAGuest,

    /// Password does not meet the minimum length.
    #[error("Password must be at least 8 characters")]
    WeakPassword,

    /// Email address is malformed.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// The account has been deactivated.
    #[error("Inactive user")]
    Inactive,

    /// Infrastructure failure (hashing, signing, persistence).
    #[error("Authentication service error: {0}")]
    ServiceUnavailable(String),
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        AuthError::ServiceUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_carries_guest_flag() {
        let user = AuthenticatedUser::new(UserId::new(), "guest@aleator.local", true);
        assert!(user.is_guest);
        assert_eq!(user.email, "guest@aleator.local");
    }

    #[test]
    fn auth_error_displays_user_facing_messages() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Incorrect email or password");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
    }
}
