//! Decision repository port (write side).
//!
//! Defines the contract for persisting and retrieving Decision
//! aggregates, including their type-specific config rows and the
//! append-only history log.
//!
//! # Design
//!
//! - **Atomic units**: create/update persist the aggregate and its
//!   history entries in one transaction — a failed write leaves nothing
//!   behind
//! - **User-scoped**: reads take the owner's id so foreign decisions are
//!   indistinguishable from missing ones

use crate::domain::decision::{Decision, HistoryEntry};
use crate::domain::foundation::{DecisionId, DomainError, UserId};
use async_trait::async_trait;

/// Repository port for Decision aggregate persistence.
#[async_trait]
pub trait DecisionRepository: Send + Sync {
    /// Persist a new decision, its config, and its initial history
    /// entries in one unit of work.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, decision: &Decision, history: &[HistoryEntry])
        -> Result<(), DomainError>;

    /// Persist config changes plus the history entries they produced in
    /// one unit of work.
    ///
    /// # Errors
    ///
    /// - `DecisionNotFound` if the decision doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, decision: &Decision, history: &[HistoryEntry])
        -> Result<(), DomainError>;

    /// Find a decision owned by the given user.
    ///
    /// Returns `None` when unknown or owned by someone else.
    async fn find_by_id(
        &self,
        id: &DecisionId,
        user_id: &UserId,
    ) -> Result<Option<Decision>, DomainError>;

    /// All decisions of a user, ordered by display order then recency.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Decision>, DomainError>;

    /// Delete a decision and everything cascading from it.
    ///
    /// # Errors
    ///
    /// - `DecisionNotFound` if the decision doesn't exist for this user
    async fn delete(&self, id: &DecisionId, user_id: &UserId) -> Result<(), DomainError>;

    /// Number of decisions the user currently has (cap enforcement).
    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// The display order to assign to a newly created decision
    /// (one past the current maximum).
    async fn next_display_order(&self, user_id: &UserId) -> Result<i32, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DecisionRepository) {}
    }
}
