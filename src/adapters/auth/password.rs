//! bcrypt password hashing adapter.

use crate::domain::foundation::AuthError;
use crate::ports::PasswordHasher;

/// `PasswordHasher` over bcrypt.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Default cost factor, the bcrypt crate's recommended value.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Custom cost factor. Tests use the minimum to stay fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::ServiceUnavailable(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AuthError::ServiceUnavailable(format!("Password check failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::with_cost(4)
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let h = hasher();
        let hash = h.hash("hunter2hunter2").unwrap();
        assert!(h.verify("hunter2hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let h = hasher();
        let hash = h.hash("hunter2hunter2").unwrap();
        assert!(!h.verify("something-else", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let h = hasher();
        assert_ne!(h.hash("same").unwrap(), h.hash("same").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(hasher().verify("pw", "not-a-bcrypt-hash").is_err());
    }
}
