use bcrypt::{hash, verify, DEFAULT_COST};

use crate::config;
use crate::error::ApiError;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Verify a password against a stored hash. Returns false on mismatch;
/// errors only on a malformed stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ApiError> {
    Ok(verify(password, stored_hash)?)
}

/// Minimum-length credential policy shared by registration and recovery.
pub fn check_password_policy(password: &str) -> Result<(), PolicyViolation> {
    let min = config::config().security.password_min_length;
    if password.len() < min {
        return Err(PolicyViolation::TooShort { min });
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub enum PolicyViolation {
    TooShort { min: usize },
}

impl PolicyViolation {
    pub fn message(&self) -> String {
        match self {
            PolicyViolation::TooShort { min } => {
                format!("Password must be at least {} characters", min)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_passwords() {
        assert!(check_password_policy("abc").is_err());
        assert!(check_password_policy("abcde").is_err());
    }

    #[test]
    fn accepts_minimum_length() {
        assert!(check_password_policy("abcdef").is_ok());
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash_password("abcdef").unwrap();
        assert!(verify_password("abcdef", &hashed).unwrap());
        assert!(!verify_password("wrong-password", &hashed).unwrap());
    }
}
