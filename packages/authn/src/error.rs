//! Error types shared across the crate.
//!
//! [`AuthError`] is the only error that crosses the crate boundary. Every credential
//! rejection collapses into [`AuthError::CredentialsSignin`] so callers cannot tell an
//! unknown email from a wrong password. [`StoreError`] describes failures of a
//! [`UserStore`](crate::store::UserStore) backend.

use thiserror::Error;

/// Public error returned by authentication, token and registration operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credentials were rejected. Deliberately carries no detail.
    #[error("invalid credentials")]
    CredentialsSignin,

    /// The session token is malformed, tampered with, signed with another secret, or expired.
    #[error("session token is invalid or expired")]
    InvalidToken,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Sign-up input was refused (bad email, short password, taken address).
    #[error("{0}")]
    Registration(String),

    #[error("token encoding failed: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure reported by a user store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A principal with the same email (or username) already exists.
    #[error("user {0} already exists")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),
}

#[cfg(feature = "server")]
impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}
