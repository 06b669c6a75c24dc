//! CreateGuestHandler - anonymous guest sessions.
//!
//! A guest account needs no credentials: it gets an opaque token (for
//! later conversion/recovery) and a regular bearer token so the rest of
//! the API sees no difference between guests and registered users.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::foundation::{AuthError, UserId};
use crate::domain::user::User;
use crate::ports::{TokenIssuer, UserRepository};

/// A freshly created guest session.
#[derive(Debug, Clone)]
pub struct GuestSession {
    pub user: User,
    pub guest_token: String,
    pub access_token: String,
}

/// Handler for creating guest sessions.
pub struct CreateGuestHandler {
    users: Arc<dyn UserRepository>,
    issuer: Arc<dyn TokenIssuer>,
}

impl CreateGuestHandler {
    pub fn new(users: Arc<dyn UserRepository>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { users, issuer }
    }

    pub async fn handle(&self) -> Result<GuestSession, AuthError> {
        let guest_token = Uuid::new_v4().simple().to_string();
        let user = User::guest(UserId::new(), guest_token.clone());
        self.users.create(&user).await?;

        let access_token = self.issuer.issue(&user)?;
        Ok(GuestSession {
            user,
            guest_token,
            access_token,
        })
    }
}
