//! Foundation types shared across the domain layer.
//!
//! Value objects, identifiers, timestamps, and the error taxonomy that
//! every other domain module builds on.

mod auth;
mod errors;
mod granularity;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use granularity::Granularity;
pub use ids::{ChoiceId, DecisionId, RollId, UserId};
pub use timestamp::Timestamp;
