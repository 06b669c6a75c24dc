//! HTTP adapter for auth endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ConvertGuestRequest, GuestSessionResponse, LoginRequest, RegisterRequest, TokenResponse,
    UserResponse,
};
pub use handlers::AuthHandlers;
pub use routes::auth_routes;
