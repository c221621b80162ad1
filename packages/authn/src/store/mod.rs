//! User lookup seam.
//!
//! The authenticator only needs [`UserStore::find_unique`]; [`UserStore::create_user`]
//! is used by sign-up and by identity providers provisioning federated accounts.
//! [`MemoryUserStore`] backs tests and local development; the PostgreSQL store lives in
//! [`crate::db`] behind the `server` feature.

use std::future::Future;

use crate::error::StoreError;
use crate::models::{NewUser, Principal};

mod memory;
pub use memory::MemoryUserStore;

/// Persistent store of principals, keyed by unique email.
pub trait UserStore {
    /// Find the principal whose email is exactly `email`.
    fn find_unique(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Principal>, StoreError>> + Send;

    /// Insert a new principal. Fails with [`StoreError::Conflict`] when the email is taken.
    fn create_user(
        &self,
        user: NewUser,
    ) -> impl Future<Output = Result<Principal, StoreError>> + Send;
}
