//! Data models for principals and the identities derived from them.

mod user;

#[cfg(feature = "server")]
pub use user::User;
pub use user::{AccountKind, IdentityRecord, NewUser, Principal, CREDENTIALS_PROVIDER};
