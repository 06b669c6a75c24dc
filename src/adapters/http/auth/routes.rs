//! HTTP routes for auth endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{convert_guest, create_guest, login, logout, me, register, AuthHandlers};

/// Creates the auth router with all endpoints.
pub fn auth_routes(handlers: AuthHandlers) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/guest", post(create_guest))
        .route("/convert", post(convert_guest))
        .route("/me", get(me))
        .route("/logout", post(logout))
        .with_state(handlers)
}
