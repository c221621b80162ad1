//! Lifecycle hooks run by [`AuthService`](super::AuthService).
//!
//! - `on_token_issue` runs whenever a token is issued or refreshed. The identity is
//!   present only right after a successful sign-in.
//! - `on_session_materialize` runs whenever a session is built from a token.
//!
//! The defaults, [`enrich_token`] and [`enrich_session`], propagate `username` from the
//! identity into the token and from the token into the session. Both are pure and
//! idempotent.

use super::session::{Session, Token};
use crate::models::IdentityRecord;

pub type TokenHook = fn(Token, Option<&IdentityRecord>) -> Token;
pub type SessionHook = fn(Session, &Token) -> Session;

/// Named hooks invoked at the token and session lifecycle points.
#[derive(Clone, Copy)]
pub struct LifecycleHooks {
    pub on_token_issue: TokenHook,
    pub on_session_materialize: SessionHook,
}

impl Default for LifecycleHooks {
    fn default() -> Self {
        Self {
            on_token_issue: enrich_token,
            on_session_materialize: enrich_session,
        }
    }
}

impl LifecycleHooks {
    pub fn token_issue(&self, token: Token, identity: Option<&IdentityRecord>) -> Token {
        (self.on_token_issue)(token, identity)
    }

    pub fn session_materialize(&self, session: Session, token: &Token) -> Session {
        (self.on_session_materialize)(session, token)
    }
}

/// Copy the freshly authenticated identity's username into the token.
pub fn enrich_token(mut token: Token, identity: Option<&IdentityRecord>) -> Token {
    if let Some(identity) = identity {
        token.username = identity.username.clone();
    }
    token
}

/// Copy the token's username into the session user, keeping every other field.
pub fn enrich_session(mut session: Session, token: &Token) -> Session {
    session.user.username = token.username.clone();
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionUser;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::{Map, Value};

    fn identity(username: Option<&str>) -> IdentityRecord {
        IdentityRecord {
            id: "1".to_string(),
            username: username.map(str::to_string),
            email: "john@email.com".to_string(),
        }
    }

    fn token() -> Token {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Token::issue(&identity(None), now, Duration::days(1))
    }

    #[test]
    fn test_enrich_token_with_identity() {
        let enriched = enrich_token(token(), Some(&identity(Some("john"))));
        assert_eq!(enriched.username.as_deref(), Some("john"));
    }

    #[test]
    fn test_enrich_token_without_identity_is_passthrough() {
        let mut base = token();
        base.username = Some("john".to_string());
        base.extra.insert("role".to_string(), Value::from("admin"));

        assert_eq!(enrich_token(base.clone(), None), base);
    }

    #[test]
    fn test_enrich_token_is_idempotent() {
        let identity = identity(Some("john"));
        let once = enrich_token(token(), Some(&identity));
        let twice = enrich_token(once.clone(), Some(&identity));
        assert_eq!(once, twice);
        assert_eq!(enrich_token(once.clone(), None), once);
    }

    #[test]
    fn test_enrich_session_preserves_fields() {
        let mut extra = Map::new();
        extra.insert("role".to_string(), Value::from("admin"));
        let session = Session {
            user: SessionUser {
                name: Some("John Doe".to_string()),
                email: Some("john@email.com".to_string()),
                image: Some("https://example.com/john.png".to_string()),
                username: Some("stale".to_string()),
                extra,
            },
            expires: "2024-01-02T00:00:00.000Z".to_string(),
        };
        let mut token = token();
        token.username = Some("john".to_string());

        let enriched = enrich_session(session.clone(), &token);
        assert_eq!(enriched.user.username.as_deref(), Some("john"));
        assert_eq!(enriched.user.name, session.user.name);
        assert_eq!(enriched.user.email, session.user.email);
        assert_eq!(enriched.user.image, session.user.image);
        assert_eq!(enriched.user.extra, session.user.extra);
        assert_eq!(enriched.expires, session.expires);
    }

    #[test]
    fn test_enrich_session_is_idempotent() {
        let mut token = token();
        token.username = Some("john".to_string());
        let base = Session::from_token(&token);

        let once = enrich_session(base, &token);
        let twice = enrich_session(once.clone(), &token);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_default_hooks_are_the_enrichers() {
        let hooks = LifecycleHooks::default();
        let identity = identity(Some("john"));

        let token = hooks.token_issue(token(), Some(&identity));
        assert_eq!(token.username.as_deref(), Some("john"));

        let session = hooks.session_materialize(Session::from_token(&token), &token);
        assert_eq!(session.user.username.as_deref(), Some("john"));
    }

    #[test]
    fn test_custom_hook() {
        fn tag(mut token: Token, _: Option<&IdentityRecord>) -> Token {
            token.extra.insert("tagged".to_string(), Value::Bool(true));
            token
        }
        let hooks = LifecycleHooks {
            on_token_issue: tag,
            ..LifecycleHooks::default()
        };

        let token = hooks.token_issue(token(), None);
        assert_eq!(token.extra.get("tagged"), Some(&Value::Bool(true)));
    }
}
