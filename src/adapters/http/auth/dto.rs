//! HTTP DTOs for auth endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::user::User;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to convert the calling guest into a registered account.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertGuestRequest {
    pub email: String,
    pub password: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Bearer token response.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Guest session response: the opaque guest token plus a bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct GuestSessionResponse {
    pub guest_token: String,
    pub access_token: String,
    pub token_type: String,
}

/// Account view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub is_guest: bool,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            is_guest: user.is_guest(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}
