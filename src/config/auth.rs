//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (JWT signing)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: SecretString,

    /// Token lifetime in minutes
    #[serde(default = "default_token_expire_minutes")]
    pub token_expire_minutes: u64,
}

impl AuthConfig {
    /// Get token lifetime as Duration
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_expire_minutes * 60)
    }

    /// Validate authentication configuration
    ///
    /// Production requires a real secret; development tolerates short
    /// ones for local setups.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production && self.jwt_secret.expose_secret().len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.token_expire_minutes == 0 {
            return Err(ValidationError::InvalidTokenExpiry);
        }
        Ok(())
    }
}

fn default_token_expire_minutes() -> u64 {
    60 * 24 * 7 // one week
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            token_expire_minutes: default_token_expire_minutes(),
        }
    }

    #[test]
    fn test_token_ttl() {
        let mut cfg = config("secret");
        cfg.token_expire_minutes = 90;
        assert_eq!(cfg.token_ttl(), Duration::from_secs(5400));
    }

    #[test]
    fn test_validation_missing_secret() {
        assert!(config("").validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_short_secret_ok_in_development() {
        assert!(config("dev-secret").validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_validation_short_secret_rejected_in_production() {
        assert!(config("dev-secret").validate(&Environment::Production).is_err());
        assert!(config("a-very-long-production-grade-secret!")
            .validate(&Environment::Production)
            .is_ok());
    }

    #[test]
    fn test_validation_zero_expiry() {
        let mut cfg = config("secret");
        cfg.token_expire_minutes = 0;
        assert!(cfg.validate(&Environment::Development).is_err());
    }
}
