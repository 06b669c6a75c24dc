//! Ports: the seams between the domain core and its collaborators.
//!
//! Repositories, token handling, and statistics reads are async traits
//! implemented by the adapters layer. The cryptographically secure
//! `RandomSource` lives with the selector in the domain and is
//! re-exported here alongside the other seams.

mod decision_repository;
mod roll_repository;
mod session_validator;
mod stats_reader;
mod user_repository;

pub use decision_repository::DecisionRepository;
pub use roll_repository::RollRepository;
pub use session_validator::{PasswordHasher, SessionValidator, TokenIssuer};
pub use stats_reader::{ServiceStats, StatsReader};
pub use user_repository::UserRepository;

pub use crate::domain::roll::RandomSource;
