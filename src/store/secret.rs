//! Argon2id hashing of account secrets.
//!
//! Secrets are hashed with per-secret random salts and stored in PHC string
//! format. Raw secrets never leave this module's call sites after creation.

use anyhow::{Context, Result, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a raw secret for storage.
///
/// # Errors
///
/// Returns an error if hashing fails (out of memory or invalid parameters).
pub fn hash_secret(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash secret: {err}"))?;
    Ok(hash.to_string())
}

/// Verify a raw secret against a stored PHC hash.
///
/// # Errors
///
/// Returns an error only when the stored hash cannot be parsed; a mismatching
/// secret yields `Ok(false)`.
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| anyhow!("stored secret hash is malformed: {err}"))
        .context("failed to parse stored hash")?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}
