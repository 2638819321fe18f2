//! Password hashing with Argon2id, PHC string format.

use crate::error::NumgenError;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Hash a password into a self-describing PHC string (Argon2 defaults:
/// 19 MiB memory, 2 iterations).
pub fn hash(password: &str) -> Result<String, NumgenError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| NumgenError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored PHC hash. Argon2 verification is
/// constant-time with respect to the password contents.
pub fn verify(password: &str, phc_hash: &str) -> Result<bool, NumgenError> {
    let parsed = PasswordHash::new(phc_hash).map_err(|e| NumgenError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
