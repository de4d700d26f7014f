use argon2::Argon2;
use crate::error::AppError;
use rand::Rng;

pub const HASH_LEN: usize = 32;

/// Generate a cryptographically secure random salt
pub fn generate_salt() -> [u8; 32] {
    rand::thread_rng().gen()
}

/// Hash a password with Argon2id using the provided salt
pub fn hash_password(password: &str, salt: &[u8]) -> Result<[u8; HASH_LEN], AppError> {
    let argon2 = Argon2::default();
    let mut hash = [0u8; HASH_LEN];

    argon2
        .hash_password_into(password.as_bytes(), salt, &mut hash)
        .map_err(|e| AppError::Crypto(format!("Password hashing failed: {}", e)))?;

    Ok(hash)
}

/// Verify a password against a stored hash and salt
pub fn verify_password(password: &str, stored_hash: &[u8], salt: &[u8]) -> Result<bool, AppError> {
    if stored_hash.len() != HASH_LEN {
        return Err(AppError::Internal("Invalid stored hash".to_string()));
    }

    let computed_hash = hash_password(password, salt)?;

    // Compare every byte so timing does not depend on the first mismatch.
    let diff = computed_hash
        .iter()
        .zip(stored_hash)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    Ok(diff == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify() {
        let password = "test_password_123";
        let salt = generate_salt();

        let hash = hash_password(password, &salt).unwrap();
        assert!(verify_password(password, &hash, &salt).unwrap());
        assert!(!verify_password("wrong_password", &hash, &salt).unwrap());
    }

    #[test]
    fn test_salt_changes_hash() {
        let first = hash_password("same password", &generate_salt()).unwrap();
        let second = hash_password("same password", &generate_salt()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_truncated_hash_rejected() {
        let salt = generate_salt();
        assert!(verify_password("whatever", &[0u8; 8], &salt).is_err());
    }
}
