//! Credential authentication, token lifecycle and session materialization.

mod config;
mod credentials;
mod hooks;
mod jwt;
mod password;
mod service;
mod session;

pub use config::{AuthConfig, OAuthConfig, Pages, ProviderInfo};
pub use credentials::{Authenticator, CredentialClaim, Rejection};
pub use hooks::{enrich_session, enrich_token, LifecycleHooks, SessionHook, TokenHook};
pub use jwt::TokenCodec;
pub use password::{hash_password, verify_password, Argon2Comparator, HashComparator};
pub use service::{AuthService, Registration, SignedSession};
pub use session::{Session, SessionUser, Token, SESSION_TOKEN_KEY};
