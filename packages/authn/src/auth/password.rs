//! # Password hashing and verification — Argon2id
//!
//! Provides the pieces used by the local (email + password) authentication path:
//!
//! - [`hash_password`] — generates a random salt via [`OsRng`], hashes the plaintext
//!   password with the default Argon2id parameters, and returns the result as a
//!   PHC-format string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`). This string is
//!   stored in the `password_hash` column of the `users` table.
//!
//! - [`verify_password`] — parses a PHC-format hash and checks whether the provided
//!   plaintext matches. Returns `Ok(true)` on success, `Ok(false)` on mismatch, or
//!   `Err` if the stored hash is malformed.
//!
//! - [`HashComparator`] — the seam the authenticator compares passwords through, with
//!   [`Argon2Comparator`] as the production implementation.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AuthError;

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::Hashing(format!("invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// One-way comparison of a plaintext password against a stored hash.
pub trait HashComparator {
    fn compare(&self, plaintext: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Compares against Argon2 PHC strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Comparator;

impl HashComparator for Argon2Comparator {
    fn compare(&self, plaintext: &str, hash: &str) -> Result<bool, AuthError> {
        verify_password(plaintext, hash)
    }
}
