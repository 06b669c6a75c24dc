//! HTTP handlers for auth endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::ErrorResponse;
use crate::application::handlers::auth::{
    ConvertGuestCommand, ConvertGuestHandler, CreateGuestHandler, LoginUserCommand,
    LoginUserHandler, RegisterUserCommand, RegisterUserHandler,
};
use crate::domain::foundation::AuthError;
use crate::ports::UserRepository;

use super::dto::{
    ConvertGuestRequest, GuestSessionResponse, LoginRequest, RegisterRequest, TokenResponse,
    UserResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AuthHandlers {
    register_handler: Arc<RegisterUserHandler>,
    login_handler: Arc<LoginUserHandler>,
    guest_handler: Arc<CreateGuestHandler>,
    convert_handler: Arc<ConvertGuestHandler>,
    users: Arc<dyn UserRepository>,
}

impl AuthHandlers {
    pub fn new(
        register_handler: Arc<RegisterUserHandler>,
        login_handler: Arc<LoginUserHandler>,
        guest_handler: Arc<CreateGuestHandler>,
        convert_handler: Arc<ConvertGuestHandler>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            register_handler,
            login_handler,
            guest_handler,
            convert_handler,
            users,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/auth/register - Register a new account
pub async fn register(
    State(handlers): State<AuthHandlers>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let cmd = RegisterUserCommand {
        email: req.email,
        password: req.password,
    };

    match handlers.register_handler.handle(cmd).await {
        Ok(user) => (StatusCode::CREATED, Json(UserResponse::from(&user))).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// POST /api/v1/auth/login - Log in and get a bearer token
pub async fn login(State(handlers): State<AuthHandlers>, Json(req): Json<LoginRequest>) -> Response {
    let cmd = LoginUserCommand {
        email: req.email,
        password: req.password,
    };

    match handlers.login_handler.handle(cmd).await {
        Ok(result) => (
            StatusCode::OK,
            Json(TokenResponse::bearer(result.access_token)),
        )
            .into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// POST /api/v1/auth/guest - Create an anonymous guest session
pub async fn create_guest(State(handlers): State<AuthHandlers>) -> Response {
    match handlers.guest_handler.handle().await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(GuestSessionResponse {
                guest_token: session.guest_token,
                access_token: session.access_token,
                token_type: "bearer".to_string(),
            }),
        )
            .into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// POST /api/v1/auth/convert - Convert the calling guest to a registered account
pub async fn convert_guest(
    State(handlers): State<AuthHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<ConvertGuestRequest>,
) -> Response {
    let cmd = ConvertGuestCommand {
        user_id: user.id,
        email: req.email,
        password: req.password,
    };

    match handlers.convert_handler.handle(cmd).await {
        Ok(result) => (
            StatusCode::OK,
            Json(TokenResponse::bearer(result.access_token)),
        )
            .into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// GET /api/v1/auth/me - Current account details
pub async fn me(State(handlers): State<AuthHandlers>, RequireAuth(user): RequireAuth) -> Response {
    match handlers.users.find_by_id(&user.id).await {
        Ok(Some(account)) => (StatusCode::OK, Json(UserResponse::from(&account))).into_response(),
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("UNAUTHENTICATED", "Account no longer exists")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to load account: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Failed to load account")),
            )
                .into_response()
        }
    }
}

/// POST /api/v1/auth/logout - Stateless logout
///
/// Tokens are not tracked server-side; the client discards its copy.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_auth_error(error: AuthError) -> Response {
    let (status, code) = match &error {
        AuthError::InvalidToken | AuthError::TokenExpired | AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
        }
        AuthError::EmailAlreadyRegistered
        | AuthError::NotAGuest
        | AuthError::WeakPassword
        | AuthError::InvalidEmail(_)
        | AuthError::Inactive => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Auth operation failed: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    (status, Json(ErrorResponse::new(code, error.to_string()))).into_response()
}
