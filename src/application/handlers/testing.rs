//! In-memory port fakes shared by handler unit tests.
//!
//! These model the store contracts closely enough for the state machine
//! to be exercised without a database: the roll fake enforces the
//! one-pending-roll rule the same way the partial unique index does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::decision::{Decision, HistoryEntry};
use crate::domain::foundation::{AuthError, DecisionId, DomainError, ErrorCode, RollId, UserId};
use crate::domain::roll::{RandomSource, Roll};
use crate::domain::user::User;
use crate::ports::{
    DecisionRepository, PasswordHasher, RollRepository, TokenIssuer, UserRepository,
};

/// Decision store over a HashMap, with an appended history log.
#[derive(Default)]
pub struct InMemoryDecisionRepository {
    decisions: Mutex<HashMap<DecisionId, Decision>>,
    history: Mutex<Vec<HistoryEntry>>,
}

impl InMemoryDecisionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(decisions: Vec<Decision>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.decisions.lock().unwrap();
            for d in decisions {
                map.insert(*d.id(), d);
            }
        }
        repo
    }

    pub fn get(&self, id: &DecisionId) -> Option<Decision> {
        self.decisions.lock().unwrap().get(id).cloned()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionRepository for InMemoryDecisionRepository {
    async fn create(
        &self,
        decision: &Decision,
        history: &[HistoryEntry],
    ) -> Result<(), DomainError> {
        self.decisions
            .lock()
            .unwrap()
            .insert(*decision.id(), decision.clone());
        self.history.lock().unwrap().extend_from_slice(history);
        Ok(())
    }

    async fn update(
        &self,
        decision: &Decision,
        history: &[HistoryEntry],
    ) -> Result<(), DomainError> {
        let mut map = self.decisions.lock().unwrap();
        if !map.contains_key(decision.id()) {
            return Err(DomainError::new(
                ErrorCode::DecisionNotFound,
                format!("Decision not found: {}", decision.id()),
            ));
        }
        map.insert(*decision.id(), decision.clone());
        self.history.lock().unwrap().extend_from_slice(history);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &DecisionId,
        user_id: &UserId,
    ) -> Result<Option<Decision>, DomainError> {
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .get(id)
            .filter(|d| d.is_owner(user_id))
            .cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Decision>, DomainError> {
        let mut list: Vec<Decision> = self
            .decisions
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.is_owner(user_id))
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            a.display_order()
                .cmp(&b.display_order())
                .then(b.created_at().cmp(a.created_at()))
        });
        Ok(list)
    }

    async fn delete(&self, id: &DecisionId, user_id: &UserId) -> Result<(), DomainError> {
        let mut map = self.decisions.lock().unwrap();
        match map.get(id) {
            Some(d) if d.is_owner(user_id) => {
                map.remove(id);
                Ok(())
            }
            _ => Err(DomainError::new(
                ErrorCode::DecisionNotFound,
                format!("Decision not found: {}", id),
            )),
        }
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.is_owner(user_id))
            .count() as u64)
    }

    async fn next_display_order(&self, user_id: &UserId) -> Result<i32, DomainError> {
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.is_owner(user_id))
            .map(|d| d.display_order())
            .max()
            .unwrap_or(0)
            + 1)
    }
}

/// Roll store that enforces at-most-one-pending-per-decision, like the
/// partial unique index in the real schema.
#[derive(Default)]
pub struct InMemoryRollRepository {
    rolls: Mutex<Vec<Roll>>,
    decisions: Mutex<Option<Arc<InMemoryDecisionRepository>>>,
}

impl InMemoryRollRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a decision store so confirmed promotions land somewhere
    /// observable.
    pub fn linked(decisions: Arc<InMemoryDecisionRepository>) -> Self {
        Self {
            rolls: Mutex::new(Vec::new()),
            decisions: Mutex::new(Some(decisions)),
        }
    }

    pub fn all(&self) -> Vec<Roll> {
        self.rolls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RollRepository for InMemoryRollRepository {
    async fn create(&self, roll: &Roll) -> Result<(), DomainError> {
        let mut rolls = self.rolls.lock().unwrap();
        if rolls
            .iter()
            .any(|r| r.decision_id() == roll.decision_id() && r.is_pending())
        {
            return Err(DomainError::new(
                ErrorCode::PendingRollExists,
                "A pending roll already exists for this decision",
            ));
        }
        rolls.push(roll.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RollId,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError> {
        Ok(self
            .rolls
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id && r.decision_id() == decision_id)
            .cloned())
    }

    async fn pending_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError> {
        Ok(self
            .rolls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.decision_id() == decision_id && r.is_pending())
            .max_by_key(|r| *r.created_at())
            .cloned())
    }

    async fn last_confirmed_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError> {
        Ok(self
            .rolls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.decision_id() == decision_id && !r.is_pending())
            .max_by_key(|r| *r.created_at())
            .cloned())
    }

    async fn list_by_decision(&self, decision_id: &DecisionId) -> Result<Vec<Roll>, DomainError> {
        let mut list: Vec<Roll> = self
            .rolls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.decision_id() == decision_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(list)
    }

    async fn count_by_user(&self, _user_id: &UserId) -> Result<u64, DomainError> {
        Ok(self.rolls.lock().unwrap().len() as u64)
    }

    async fn confirm(&self, roll: &Roll, promoted: Option<&Decision>) -> Result<(), DomainError> {
        let mut rolls = self.rolls.lock().unwrap();
        let stored = rolls
            .iter_mut()
            .find(|r| r.id() == roll.id())
            .ok_or_else(|| {
                DomainError::new(ErrorCode::RollNotFound, format!("Roll not found: {}", roll.id()))
            })?;
        *stored = roll.clone();
        drop(rolls);

        if let (Some(decision), Some(store)) = (promoted, self.decisions.lock().unwrap().as_ref()) {
            store
                .decisions
                .lock()
                .unwrap()
                .insert(*decision.id(), decision.clone());
        }
        Ok(())
    }
}

/// User store over a HashMap.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(users: Vec<User>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.users.lock().unwrap();
            for u in users {
                map.insert(*u.id(), u);
            }
        }
        repo
    }

    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let mut map = self.users.lock().unwrap();
        if map.values().any(|u| u.email() == user.email()) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "duplicate key value violates unique constraint on email",
            ));
        }
        map.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut map = self.users.lock().unwrap();
        if !map.contains_key(user.id()) {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", user.id()),
            ));
        }
        map.insert(*user.id(), user.clone());
        Ok(())
    }
}

/// Reversible "hash" for asserting on what was stored.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("hashed:{}", password))
    }
}

/// Issues predictable tokens derived from the account id.
pub struct StaticIssuer;

impl TokenIssuer for StaticIssuer {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        Ok(format!("token-for-{}", user.id()))
    }
}

/// Replays a fixed sequence of draws, wrapping around at the end.
pub struct SequenceRandomSource {
    values: Vec<u32>,
    next: Mutex<usize>,
}

impl SequenceRandomSource {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            next: Mutex::new(0),
        }
    }
}

impl RandomSource for SequenceRandomSource {
    fn below(&self, bound: u32) -> u32 {
        let mut next = self.next.lock().unwrap();
        let value = self.values[*next % self.values.len()];
        *next += 1;
        value % bound
    }
}
