//! Account lifecycle handlers: register, login, guest sessions,
//! guest conversion.

mod convert_guest;
mod create_guest;
mod login_user;
mod register_user;

pub use convert_guest::{ConvertGuestCommand, ConvertGuestHandler, ConvertGuestResult};
pub use create_guest::{CreateGuestHandler, GuestSession};
pub use login_user::{LoginResult, LoginUserCommand, LoginUserHandler};
pub use register_user::{RegisterUserCommand, RegisterUserHandler, MIN_PASSWORD_LENGTH};
