//! # authn — credential authentication and session claims
//!
//! Verifies email + password sign-ins against a user store, issues signed session
//! tokens, and materializes the session document application code reads.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | credential authenticator, Argon2 hashing, lifecycle hooks, JWT codec, sessions, config |
//! | [`db`] | `server` | PostgreSQL connection pool, migrations and [`db::PgUserStore`] |
//! | [`models`] | — | principals (`Principal`, `AccountKind`) and the `IdentityRecord` projection |
//! | [`store`] | — | the `UserStore` seam and an in-memory implementation |
//!
//! ## Account kinds
//!
//! A principal is either a **credentials** account with a stored password hash, or a
//! **federated** account provisioned by an identity provider. Federated accounts have
//! no local password, so the authenticator never rejects them for a mismatch.

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use auth::{AuthConfig, AuthService, CredentialClaim, Session, SignedSession};
pub use error::{AuthError, StoreError};
pub use models::{AccountKind, IdentityRecord, Principal};
pub use store::{MemoryUserStore, UserStore};
