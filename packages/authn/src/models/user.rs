//! # Principal model
//!
//! Defines the representations of an account:
//!
//! ## [`User`] (server only)
//!
//! The complete row from the `users` table, loaded with [`sqlx::FromRow`]:
//!
//! - `id` — primary key (`UUID v4`).
//! - `username`, `email`, `name`, `image` — profile fields.
//! - `provider` — `"credentials"` for email+password accounts, otherwise the identity
//!   provider that provisioned the account (`"github"`, `"google"`).
//! - `password_hash` — Argon2 PHC string, present only for credential accounts.
//! - `created_at` / `updated_at` — audit timestamps.
//!
//! [`User::into_principal`] turns the nullable `password_hash` column into an explicit
//! [`AccountKind`].
//!
//! ## [`Principal`]
//!
//! The store-agnostic account the authenticator works with. Whether the account can be
//! checked against a local password is encoded in [`AccountKind`], so the "no local
//! password" branch is an exhaustive match rather than an `Option` test.
//!
//! ## [`IdentityRecord`]
//!
//! The minimal payload handed to the token layer after a successful sign-in. It never
//! carries the password hash.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;
#[cfg(feature = "server")]
use uuid::Uuid;

/// Provider name stored for email+password accounts.
pub const CREDENTIALS_PROVIDER: &str = "credentials";

/// Full user record from the database.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub provider: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl User {
    /// Convert the row into a [`Principal`].
    pub fn into_principal(self) -> Principal {
        let account = match self.password_hash {
            Some(password_hash) => AccountKind::Credentials { password_hash },
            None => AccountKind::Federated {
                provider: self.provider,
            },
        };

        Principal {
            id: self.id.to_string(),
            username: self.username,
            email: self.email,
            name: self.name,
            image: self.image,
            account,
        }
    }
}

/// How a principal proves who it is.
#[derive(Clone, PartialEq, Eq)]
pub enum AccountKind {
    /// Local account with a stored one-way password hash.
    Credentials { password_hash: String },
    /// Account provisioned by an external identity provider. Has no local password.
    Federated { provider: String },
}

impl AccountKind {
    /// Provider name as stored in the `provider` column.
    pub fn provider(&self) -> &str {
        match self {
            AccountKind::Credentials { .. } => CREDENTIALS_PROVIDER,
            AccountKind::Federated { provider } => provider,
        }
    }

    pub fn password_hash(&self) -> Option<&str> {
        match self {
            AccountKind::Credentials { password_hash } => Some(password_hash),
            AccountKind::Federated { .. } => None,
        }
    }
}

impl fmt::Debug for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Credentials { .. } => f
                .debug_struct("Credentials")
                .field("password_hash", &"<redacted>")
                .finish(),
            AccountKind::Federated { provider } => f
                .debug_struct("Federated")
                .field("provider", provider)
                .finish(),
        }
    }
}

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub username: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub account: AccountKind,
}

impl Principal {
    /// Project the principal into the identity propagated to the session layer.
    pub fn identity(&self) -> IdentityRecord {
        IdentityRecord {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Identity returned by a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: String,
    pub username: Option<String>,
    pub email: String,
}

/// Input for creating a principal in a store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub account: AccountKind,
}
