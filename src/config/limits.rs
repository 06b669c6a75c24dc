//! Per-user resource caps.

use serde::Deserialize;

use super::error::ValidationError;

/// Per-user resource caps, checked before creation.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum decisions a single user may have.
    #[serde(default = "default_max_decisions")]
    pub max_decisions_per_user: u64,

    /// Maximum rolls across all of a single user's decisions.
    #[serde(default = "default_max_rolls")]
    pub max_rolls_per_user: u64,
}

impl LimitsConfig {
    /// Validate limits configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_decisions_per_user == 0 || self.max_rolls_per_user == 0 {
            return Err(ValidationError::InvalidLimits);
        }
        Ok(())
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_decisions_per_user: default_max_decisions(),
            max_rolls_per_user: default_max_rolls(),
        }
    }
}

fn default_max_decisions() -> u64 {
    100
}

fn default_max_rolls() -> u64 {
    1_000_000
}
