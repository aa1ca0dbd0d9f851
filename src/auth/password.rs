// Password hashing for stored user submissions
// Plaintext passwords never leave the request handler

use bcrypt::{hash, verify, BcryptError};

/// Work factor for stored hashes; tests use the bcrypt minimum
#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

/// Hashes a password using bcrypt
///
/// # Example
/// ```
/// use campus_api::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").expect("valid hash");
/// assert!(verify_password("my_password", &hash).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, COST)
}

/// Verifies a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let hash = hash_password("correct-horse").expect("valid hash");
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("battery-staple", &hash).unwrap());
    }

    #[test]
    fn hash_is_salted() {
        let first = hash_password("correct-horse").expect("valid hash");
        let second = hash_password("correct-horse").expect("valid hash");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
