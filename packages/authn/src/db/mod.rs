//! # Database module — PostgreSQL user store
//!
//! Entirely gated behind `#[cfg(feature = "server")]` so that the core authenticator
//! builds and tests without SQLx.
//!
//! ## Design
//!
//! The pool is a **lazy, process-wide singleton** backed by a [`tokio::sync::OnceCell`].
//! The first call to [`get_pool`] reads `DATABASE_URL` from the environment (via `dotenvy`),
//! opens a connection pool with up to 5 connections, and caches the result for all
//! subsequent callers.
//!
//! ## Re-exports
//!
//! - [`get_pool`] — returns `&'static PgPool`, initialising it on first use.
//! - [`migrate`] — applies the bundled `users` migration.
//! - [`PgUserStore`] — [`UserStore`](crate::store::UserStore) over the `users` table.

#[cfg(feature = "server")]
mod pool;
#[cfg(feature = "server")]
mod users;

#[cfg(feature = "server")]
pub use pool::{get_pool, migrate};
#[cfg(feature = "server")]
pub use users::PgUserStore;
