//! Argon2id password hashing.
//!
//! Hashing parameters come from [`AuthConfig`] so operators can trade memory
//! for CPU on small hosts. Callers on the async runtime should wrap these in
//! `spawn_blocking`; the account service does that.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::AuthConfig;

/// Hash a password using Argon2id with optional custom params.
pub fn hash_password(password: &str, config: Option<&AuthConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// The verifier reads its params from the hash string itself, so hashes
/// created under older settings keep verifying after a config change.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("secret1", None).unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("secret1", None).unwrap();
        let b = hash_password("secret1", None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn custom_params_produce_verifiable_hash() {
        let mut config = AuthConfig::default();
        config.argon2_memory_cost_kib = 4096;
        config.argon2_time_cost = 2;

        let hash = hash_password("secret1", Some(&config)).unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("secret1", "not-a-phc-string").is_err());
    }
}
