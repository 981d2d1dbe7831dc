//! Client secret generation and verification.
//!
//! Secrets are stored as Argon2id PHC strings. Plaintext secrets are
//! shown to the operator once at registration time and never persisted.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::AuthError;

/// Prefix for generated client secrets, useful for secret scanning.
const SECRET_PREFIX: &str = "cs_";

/// Generates a new plaintext client secret.
#[must_use]
pub fn generate_client_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    format!("{SECRET_PREFIX}{}", hex::encode(bytes))
}

/// Hashes a client secret for storage.
pub fn hash_secret(secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| AuthError::internal(format!("failed to hash client secret: {e}")))?;
    Ok(hash.to_string())
}

/// Verifies a plaintext secret against a stored PHC hash.
///
/// Returns `Ok(false)` for a mismatch and `Err` only when the stored
/// hash itself cannot be parsed.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::internal(format!("stored secret hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_shape() {
        let secret = generate_client_secret();
        assert!(secret.starts_with("cs_"));
        assert_eq!(secret.len(), 3 + 64);
        assert_ne!(secret, generate_client_secret());
    }

    #[test]
    fn test_hash_and_verify() {
        let secret = generate_client_secret();
        let hash = hash_secret(&secret).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_secret(&secret, &hash).unwrap());
        assert!(!verify_secret("wrong", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(verify_secret("anything", "not-a-phc-string").is_err());
    }
}
