//! Decision-specific error types.

use crate::domain::foundation::{
    ChoiceId, DecisionId, DomainError, ErrorCode, RollId, Timestamp, ValidationError,
};

/// Errors surfaced by decision and roll operations.
///
/// Every variant is a recoverable-by-caller condition; infrastructure
/// failures pass through unchanged in `Infrastructure`.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionError {
    /// Decision unknown or not owned by the caller.
    NotFound(DecisionId),
    /// Choice unknown within the decision.
    ChoiceNotFound(ChoiceId),
    /// Roll unknown within the decision.
    RollNotFound(RollId),
    /// Caller does not own the decision.
    Forbidden,
    /// Malformed probability, weights, precision, or field content.
    ValidationFailed { field: String, message: String },
    /// An unconfirmed roll already exists for this decision.
    PendingRollExists,
    /// The decision's cooldown window has not elapsed.
    OnCooldown { ends_at: Timestamp },
    /// The roll's follow-through flag has already been set.
    AlreadyConfirmed,
    /// A per-user cap (decisions or rolls) would be exceeded.
    LimitExceeded { resource: &'static str, limit: u64 },
    /// Persistence or other lower-level failure, propagated unchanged.
    Infrastructure(String),
}

impl DecisionError {
    pub fn not_found(id: DecisionId) -> Self {
        DecisionError::NotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DecisionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn on_cooldown(ends_at: Timestamp) -> Self {
        DecisionError::OnCooldown { ends_at }
    }

    pub fn limit_exceeded(resource: &'static str, limit: u64) -> Self {
        DecisionError::LimitExceeded { resource, limit }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        DecisionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DecisionError::NotFound(_) => ErrorCode::DecisionNotFound,
            DecisionError::ChoiceNotFound(_) => ErrorCode::ChoiceNotFound,
            DecisionError::RollNotFound(_) => ErrorCode::RollNotFound,
            DecisionError::Forbidden => ErrorCode::Forbidden,
            DecisionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            DecisionError::PendingRollExists => ErrorCode::PendingRollExists,
            DecisionError::OnCooldown { .. } => ErrorCode::OnCooldown,
            DecisionError::AlreadyConfirmed => ErrorCode::AlreadyConfirmed,
            DecisionError::LimitExceeded { .. } => ErrorCode::LimitExceeded,
            DecisionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            DecisionError::NotFound(id) => format!("Decision not found: {}", id),
            DecisionError::ChoiceNotFound(id) => format!("Choice not found: {}", id),
            DecisionError::RollNotFound(id) => format!("Roll not found: {}", id),
            DecisionError::Forbidden => "Permission denied".to_string(),
            DecisionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            DecisionError::PendingRollExists => {
                "A pending roll must be confirmed before rolling again".to_string()
            }
            DecisionError::OnCooldown { ends_at } => {
                format!("Decision is on cooldown until {}", ends_at)
            }
            DecisionError::AlreadyConfirmed => "Roll already confirmed".to_string(),
            DecisionError::LimitExceeded { resource, limit } => {
                format!("Maximum of {} {} allowed per user", limit, resource)
            }
            DecisionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for DecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DecisionError {}

impl From<DomainError> for DecisionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => DecisionError::Forbidden,
            ErrorCode::PendingRollExists => DecisionError::PendingRollExists,
            ErrorCode::AlreadyConfirmed => DecisionError::AlreadyConfirmed,
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => DecisionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => DecisionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for DecisionError {
    fn from(err: ValidationError) -> Self {
        DecisionError::from(DomainError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_cooldown_carries_resume_timestamp() {
        let ends_at = Timestamp::now().plus_hours(2.0);
        let err = DecisionError::on_cooldown(ends_at);
        match err {
            DecisionError::OnCooldown { ends_at: ts } => assert_eq!(ts, ends_at),
            _ => panic!("expected OnCooldown"),
        }
    }

    #[test]
    fn limit_exceeded_names_the_resource() {
        let err = DecisionError::limit_exceeded("decisions", 100);
        assert_eq!(err.message(), "Maximum of 100 decisions allowed per user");
        assert_eq!(err.code(), ErrorCode::LimitExceeded);
    }

    #[test]
    fn domain_validation_error_maps_to_validation_failed() {
        let err: DecisionError = DomainError::validation("weight", "out of range").into();
        assert!(matches!(err, DecisionError::ValidationFailed { .. }));
    }

    #[test]
    fn domain_pending_roll_code_maps_through() {
        let err: DecisionError =
            DomainError::new(ErrorCode::PendingRollExists, "duplicate pending roll").into();
        assert_eq!(err, DecisionError::PendingRollExists);
    }
}
