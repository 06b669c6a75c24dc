//! User account aggregate.

mod aggregate;

pub use aggregate::User;
