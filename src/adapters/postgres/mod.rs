//! PostgreSQL adapters for the repository ports.

mod decision_repository;
mod roll_repository;
mod stats_reader;
mod user_repository;

pub use decision_repository::PostgresDecisionRepository;
pub use roll_repository::PostgresRollRepository;
pub use stats_reader::PostgresStatsReader;
pub use user_repository::PostgresUserRepository;
