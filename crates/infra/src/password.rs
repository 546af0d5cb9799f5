//! Argon2 secret hashing shared by the credential stores.
//!
//! Hashing is CPU-bound; the async wrappers move it onto tokio's blocking pool
//! so request workers are never stalled by it.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;

use bookshelf_auth::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("secret hashing failed: {0}")]
pub struct PasswordError(String);

/// Hash `secret` into a PHC string with a fresh random salt.
pub fn hash_secret(secret: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| PasswordError(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// One-way comparison. An unparsable stored hash never verifies.
pub fn verify_secret(hash: &str, presented: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(presented.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn hash_secret_blocking(secret: String) -> Result<String, StoreError> {
    tokio::task::spawn_blocking(move || hash_secret(&secret))
        .await
        .map_err(|e| StoreError::unavailable(format!("hashing task failed: {e}")))?
        .map_err(|e| StoreError::unavailable(e.to_string()))
}

pub async fn verify_secret_blocking(hash: String, presented: String) -> Result<bool, StoreError> {
    tokio::task::spawn_blocking(move || verify_secret(&hash, &presented))
        .await
        .map_err(|e| StoreError::unavailable(format!("verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_secret() {
        let hash = hash_secret("s1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_secret(&hash, "s1"));
        assert!(!verify_secret(&hash, "s2"));
        assert!(!verify_secret(&hash, ""));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_secret("same").unwrap(), hash_secret("same").unwrap());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_secret("not-a-phc-string", "anything"));
    }
}
