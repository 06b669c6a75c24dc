//! User account aggregate.
//!
//! Accounts come in two flavors: registered (email + password) and guest
//! (opaque token, convertible to registered later). Deleting an account
//! cascades to every decision it owns.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, Timestamp, UserId};

/// A registered or guest user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    password_hash: String,
    created_at: Timestamp,
    is_active: bool,
    is_guest: bool,
    guest_token: Option<String>,
}

impl User {
    /// Creates a registered account.
    pub fn register(id: UserId, email: String, password_hash: String) -> Result<Self, AuthError> {
        Self::validate_email(&email)?;
        Ok(Self {
            id,
            email,
            password_hash,
            created_at: Timestamp::now(),
            is_active: true,
            is_guest: false,
            guest_token: None,
        })
    }

    /// Creates a guest account with an opaque session token and a
    /// placeholder email derived from the id.
    pub fn guest(id: UserId, guest_token: String) -> Self {
        Self {
            email: format!("guest-{}@aleator.local", id),
            id,
            password_hash: String::new(),
            created_at: Timestamp::now(),
            is_active: true,
            is_guest: true,
            guest_token: Some(guest_token),
        }
    }

    /// Reconstitute an account from persistence (no validation).
    pub fn reconstitute(
        id: UserId,
        email: String,
        password_hash: String,
        created_at: Timestamp,
        is_active: bool,
        is_guest: bool,
        guest_token: Option<String>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            created_at,
            is_active,
            is_guest,
            guest_token,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_guest(&self) -> bool {
        self.is_guest
    }

    pub fn guest_token(&self) -> Option<&str> {
        self.guest_token.as_deref()
    }

    /// Fails with `Inactive` when the account has been deactivated.
    pub fn ensure_active(&self) -> Result<(), AuthError> {
        if self.is_active {
            Ok(())
        } else {
            Err(AuthError::Inactive)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Converts a guest account into a registered one, clearing the guest
    /// token. All decisions and rolls stay attached to the account.
    ///
    /// # Errors
    ///
    /// - `NotAGuest` if the account is already registered
    pub fn convert_to_registered(
        &mut self,
        email: String,
        password_hash: String,
    ) -> Result<(), AuthError> {
        if !self.is_guest {
            return Err(AuthError::NotAGuest);
        }
        Self::validate_email(&email)?;
        self.email = email;
        self.password_hash = password_hash;
        self.is_guest = false;
        self.guest_token = None;
        Ok(())
    }

    fn validate_email(email: &str) -> Result<(), AuthError> {
        let trimmed = email.trim();
        if trimmed.is_empty() || !trimmed.contains('@') || trimmed.len() > 254 {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }
}
