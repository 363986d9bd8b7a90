//! Password hashing helpers

use crate::errors::{DomainError, DomainResult};

/// Hash a raw password with bcrypt
pub fn hash_password(raw: &str) -> DomainResult<String> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST).map_err(|e| DomainError::Internal {
        message: format!("Failed to hash password: {}", e),
    })
}

/// Check a raw password against a stored bcrypt hash
pub fn verify_password(raw: &str, hash: &str) -> DomainResult<bool> {
    bcrypt::verify(raw, hash).map_err(|e| DomainError::Internal {
        message: format!("Failed to verify password: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("s3cret-password").unwrap();
        assert_ne!(hash, "s3cret-password");
        assert!(verify_password("s3cret-password", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
