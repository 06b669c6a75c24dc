//! Roll repository port.
//!
//! Persists rolls and their config snapshots, and answers the two
//! queries the roll state machine is built on: "is there a pending
//! roll?" and "when was the last confirmed roll?".
//!
//! # Concurrency
//!
//! Implementations must make `create` safe against concurrent rolls of
//! the same decision: at most one roll per decision may be pending. The
//! PostgreSQL adapter backs this with a partial unique index and maps
//! the violation to `PendingRollExists`, so two racing rolls cannot both
//! commit.

use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, DomainError, RollId, UserId};
use crate::domain::roll::Roll;
use async_trait::async_trait;

/// Repository port for Roll persistence.
#[async_trait]
pub trait RollRepository: Send + Sync {
    /// Persist a new pending roll and its snapshot rows in one unit of
    /// work.
    ///
    /// # Errors
    ///
    /// - `PendingRollExists` if a pending roll already exists for the
    ///   decision (store-level uniqueness)
    /// - `DatabaseError` on persistence failure
    async fn create(&self, roll: &Roll) -> Result<(), DomainError>;

    /// Find a roll within a decision.
    ///
    /// Returns `None` when unknown or belonging to another decision.
    async fn find_by_id(
        &self,
        id: &RollId,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError>;

    /// The decision's pending roll, if one exists.
    async fn pending_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError>;

    /// The decision's most recent confirmed roll, if any. Drives the
    /// cooldown check.
    async fn last_confirmed_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError>;

    /// All rolls of a decision, most recent first.
    async fn list_by_decision(&self, decision_id: &DecisionId) -> Result<Vec<Roll>, DomainError>;

    /// Total rolls across all of a user's decisions (cap enforcement).
    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// Persist a confirmed roll, and — when the user followed through —
    /// the promoted live config, in one unit of work.
    ///
    /// # Errors
    ///
    /// - `RollNotFound` if the roll doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn confirm(&self, roll: &Roll, promoted: Option<&Decision>) -> Result<(), DomainError>;
}
