//! Sign-in, sign-up and session refresh on top of the authenticator.
//!
//! ## Flow
//!
//! 1. **[`sign_in`](AuthService::sign_in)** authenticates the claim, issues a base
//!    [`Token`], runs `on_token_issue` with the identity, and materializes the session.
//! 2. **[`refresh`](AuthService::refresh)** is called on every session read. It verifies
//!    the signed token, renews its expiry, runs `on_token_issue` without an identity,
//!    and materializes the session again.
//! 3. **[`register`](AuthService::register)** creates a credentials account and signs
//!    it in.
//!
//! The caller persists [`SignedSession::token`] and hands it back to `refresh` on the
//! next request.

use std::fmt;

use chrono::Utc;
use serde::Deserialize;

use super::config::AuthConfig;
use super::credentials::{Authenticator, CredentialClaim};
use super::hooks::LifecycleHooks;
use super::jwt::TokenCodec;
use super::password::{hash_password, Argon2Comparator, HashComparator};
use super::session::{Session, Token};
use crate::error::{AuthError, StoreError};
use crate::models::{AccountKind, IdentityRecord, NewUser};
use crate::store::UserStore;

const MIN_PASSWORD_LEN: usize = 8;

/// A materialized session together with the signed token it was built from.
#[derive(Debug, Clone)]
pub struct SignedSession {
    pub session: Session,
    pub token: String,
}

/// Sign-up input.
#[derive(Clone, Default, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("username", &self.username)
            .field("name", &self.name)
            .finish()
    }
}

pub struct AuthService<S, C = Argon2Comparator> {
    authenticator: Authenticator<S, C>,
    codec: TokenCodec,
    hooks: LifecycleHooks,
    config: AuthConfig,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(store: S, config: AuthConfig) -> Result<Self, AuthError> {
        Self::with_parts(Authenticator::new(store), config, LifecycleHooks::default())
    }
}

impl<S: UserStore, C: HashComparator> AuthService<S, C> {
    pub fn with_parts(
        authenticator: Authenticator<S, C>,
        config: AuthConfig,
        hooks: LifecycleHooks,
    ) -> Result<Self, AuthError> {
        let codec = TokenCodec::new(&config.secret)?;
        Ok(Self {
            authenticator,
            codec,
            hooks,
            config,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authenticate a credential claim and start a session.
    pub async fn sign_in(&self, claim: &CredentialClaim) -> Result<SignedSession, AuthError> {
        let identity = self.authenticator.authenticate(claim).await?;
        self.start_session(&identity)
    }

    /// Verify a signed token, renew it, and rebuild the session from it.
    pub fn refresh(&self, encoded: &str) -> Result<SignedSession, AuthError> {
        let token = self
            .codec
            .decode(encoded)?
            .renewed(Utc::now(), self.config.session_max_age);
        let token = self.hooks.token_issue(token, None);
        self.seal(token)
    }

    /// Create a credentials account and sign it in.
    pub async fn register(&self, registration: Registration) -> Result<SignedSession, AuthError> {
        let new_user = validate_registration(registration)?;
        let email = new_user.email.clone();

        let principal = match self.authenticator.store().create_user(new_user).await {
            Ok(principal) => principal,
            Err(StoreError::Conflict(_)) => {
                return Err(AuthError::Registration(
                    "An account with this email or username already exists".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %principal.id, %email, "registered credentials account");
        self.start_session(&principal.identity())
    }

    fn start_session(&self, identity: &IdentityRecord) -> Result<SignedSession, AuthError> {
        let token = Token::issue(identity, Utc::now(), self.config.session_max_age);
        let token = self.hooks.token_issue(token, Some(identity));
        self.seal(token)
    }

    fn seal(&self, token: Token) -> Result<SignedSession, AuthError> {
        let session = self
            .hooks
            .session_materialize(Session::from_token(&token), &token);
        let token = self.codec.encode(&token)?;
        Ok(SignedSession { session, token })
    }
}

fn validate_registration(registration: Registration) -> Result<NewUser, AuthError> {
    let email = registration.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::Registration("Invalid email address".to_string()));
    }
    if registration.password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Registration(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let username = match registration.username {
        Some(username) if username.trim().is_empty() => {
            return Err(AuthError::Registration("Username must not be blank".to_string()))
        }
        Some(username) => Some(username.trim().to_string()),
        None => None,
    };
    let name = registration
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let password_hash = hash_password(&registration.password)?;

    Ok(NewUser {
        email,
        username,
        name,
        image: None,
        account: AccountKind::Credentials { password_hash },
    })
}
