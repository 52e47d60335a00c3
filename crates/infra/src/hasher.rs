//! Bcrypt-backed hashing.

use wardflow_core::{DomainError, DomainResult};
use wardflow_credentials::Hasher;

/// Production [`Hasher`] using bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower costs (bcrypt minimum is 4) keep test suites fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
        bcrypt::verify(plaintext, hash)
            .map_err(|e| DomainError::internal(format!("password verification failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = BcryptHasher::with_cost(4);
        let hash = hasher.hash("s3cret-pw").unwrap();

        assert_ne!(hash, "s3cret-pw");
        assert!(hasher.verify("s3cret-pw", &hash).unwrap());
        assert!(!hasher.verify("wrong-pw", &hash).unwrap());
    }
}
