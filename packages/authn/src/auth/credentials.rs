//! # Credential authenticator
//!
//! Verifies an email + password claim against a [`UserStore`] and a [`HashComparator`].
//!
//! 1. An absent or empty email or password is rejected outright.
//! 2. The principal is looked up by exact email.
//! 3. A [`AccountKind::Credentials`] principal must match its stored hash. A
//!    [`AccountKind::Federated`] principal has no local password; its existence was
//!    established by the identity provider, so the comparison is skipped.
//! 4. The result is the principal's [`IdentityRecord`].
//!
//! Every [`Rejection`], including store and comparator failures, is reported to the
//! caller as [`AuthError::CredentialsSignin`]. The reason is only logged. An unknown
//! email still pays for one hash comparison, against a throwaway hash, so it takes
//! as long as a wrong password.

use std::fmt;
use std::sync::LazyLock;

use serde::Deserialize;
use thiserror::Error;

use super::password::{hash_password, Argon2Comparator, HashComparator};
use crate::error::{AuthError, StoreError};
use crate::models::{AccountKind, IdentityRecord};
use crate::store::UserStore;

/// Hash compared against when no principal matches the email.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("no such principal").unwrap_or_default());

/// Email + password offered by a caller.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialClaim {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialClaim {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    /// Both fields, if both are present and non-empty.
    fn fields(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().filter(|e| !e.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

impl fmt::Debug for CredentialClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialClaim")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Why a claim was rejected. Never leaves the crate boundary.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("email or password missing")]
    MissingCredentials,
    #[error("no principal with that email")]
    UnknownPrincipal,
    #[error("password does not match")]
    PasswordMismatch,
    #[error("user store failed: {0}")]
    Store(#[from] StoreError),
    #[error("hash comparison failed: {0}")]
    Comparator(AuthError),
}

/// Credential authenticator over a user store and a hash comparator.
#[derive(Debug, Clone)]
pub struct Authenticator<S, C = Argon2Comparator> {
    store: S,
    comparator: C,
}

impl<S: UserStore> Authenticator<S> {
    pub fn new(store: S) -> Self {
        Self::with_comparator(store, Argon2Comparator)
    }
}

impl<S: UserStore, C: HashComparator> Authenticator<S, C> {
    pub fn with_comparator(store: S, comparator: C) -> Self {
        Self { store, comparator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Authenticate a claim. All failures collapse to [`AuthError::CredentialsSignin`].
    pub async fn authenticate(&self, claim: &CredentialClaim) -> Result<IdentityRecord, AuthError> {
        match self.verify(claim).await {
            Ok(identity) => {
                tracing::info!(user_id = %identity.id, "credentials accepted");
                Ok(identity)
            }
            Err(reason) => {
                match &reason {
                    Rejection::Store(_) | Rejection::Comparator(_) => {
                        tracing::error!(%reason, "credentials check failed")
                    }
                    _ => tracing::debug!(%reason, "credentials rejected"),
                }
                Err(AuthError::CredentialsSignin)
            }
        }
    }

    /// Run the checks and report the precise reason for a rejection.
    pub async fn verify(&self, claim: &CredentialClaim) -> Result<IdentityRecord, Rejection> {
        let (email, password) = claim.fields().ok_or(Rejection::MissingCredentials)?;

        let Some(principal) = self.store.find_unique(email).await? else {
            let _ = self.comparator.compare(password, &DUMMY_HASH);
            return Err(Rejection::UnknownPrincipal);
        };

        match &principal.account {
            AccountKind::Credentials { password_hash } => {
                let matched = self
                    .comparator
                    .compare(password, password_hash)
                    .map_err(Rejection::Comparator)?;
                if !matched {
                    return Err(Rejection::PasswordMismatch);
                }
            }
            AccountKind::Federated { provider } => {
                tracing::debug!(%provider, "no local password, trusting identity provider");
            }
        }

        Ok(principal.identity())
    }
}
