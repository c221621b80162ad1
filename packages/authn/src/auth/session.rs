//! Token and session claim types.
//!
//! [`Token`] is the long-lived claim set signed into the session JWT. [`Session`] is the
//! outward-facing document materialized from a token on every request. Both carry an
//! open map of extra fields so that hooks can add claims without changing these types.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::IdentityRecord;

/// Key for storing the signed session token in the server-side session.
pub const SESSION_TOKEN_KEY: &str = "session_token";

/// Claims carried by the session JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Subject: principal id.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
    /// Token id.
    pub jti: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Token {
    /// Base token for a freshly authenticated identity, before any hook runs.
    pub fn issue(identity: &IdentityRecord, now: DateTime<Utc>, max_age: Duration) -> Self {
        Self {
            sub: identity.id.clone(),
            name: None,
            email: Some(identity.email.clone()),
            picture: None,
            username: None,
            iat: now.timestamp(),
            exp: (now + max_age).timestamp(),
            jti: Uuid::new_v4().to_string(),
            extra: Map::new(),
        }
    }

    /// Same claims with a new issue time and expiry.
    pub fn renewed(mut self, now: DateTime<Utc>, max_age: Duration) -> Self {
        self.iat = now.timestamp();
        self.exp = (now + max_age).timestamp();
        self
    }
}

/// The user object exposed by a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Session document returned to application code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    /// Expiry as an RFC 3339 timestamp.
    pub expires: String,
}

impl Session {
    /// Base session derived from a token, before any hook runs.
    pub fn from_token(token: &Token) -> Self {
        let expires = DateTime::<Utc>::from_timestamp(token.exp, 0)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default();

        Self {
            user: SessionUser {
                name: token.name.clone(),
                email: token.email.clone(),
                image: token.picture.clone(),
                username: None,
                extra: Map::new(),
            },
            expires,
        }
    }

    /// Name to greet the user by: username first, then display name.
    pub fn display_name(&self) -> Option<&str> {
        self.user
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.user.name.as_deref().filter(|n| !n.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn identity() -> IdentityRecord {
        IdentityRecord {
            id: "1".to_string(),
            username: Some("john".to_string()),
            email: "john@email.com".to_string(),
        }
    }

    #[test]
    fn test_issue_sets_base_claims() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let token = Token::issue(&identity(), now, Duration::days(30));

        assert_eq!(token.sub, "1");
        assert_eq!(token.email.as_deref(), Some("john@email.com"));
        assert!(token.username.is_none());
        assert_eq!(token.iat, now.timestamp());
        assert_eq!(token.exp, now.timestamp() + 30 * 24 * 60 * 60);
        assert!(Uuid::parse_str(&token.jti).is_ok());
    }

    #[test]
    fn test_renewed_keeps_claims() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut token = Token::issue(&identity(), now, Duration::hours(1));
        token.username = Some("john".to_string());

        let later = now + Duration::minutes(30);
        let renewed = token.clone().renewed(later, Duration::hours(1));
        assert_eq!(renewed.iat, later.timestamp());
        assert_eq!(renewed.exp, (later + Duration::hours(1)).timestamp());
        assert_eq!(renewed.jti, token.jti);
        assert_eq!(renewed.username, token.username);
    }

    #[test]
    fn test_session_from_token() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let token = Token::issue(&identity(), now, Duration::days(1));
        let session = Session::from_token(&token);

        assert_eq!(session.user.email.as_deref(), Some("john@email.com"));
        assert!(session.user.name.is_none());
        assert_eq!(session.expires, "2024-01-02T00:00:00.000Z");
    }

    #[test]
    fn test_extra_claims_survive_serialization() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut token = Token::issue(&identity(), now, Duration::days(1));
        token.extra.insert("role".to_string(), Value::from("admin"));

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("username").is_none());

        let back: Token = serde_json::from_value(json).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn test_display_name_prefers_username() {
        let mut session = Session {
            user: SessionUser {
                name: Some("John Doe".to_string()),
                ..Default::default()
            },
            expires: String::new(),
        };
        assert_eq!(session.display_name(), Some("John Doe"));

        session.user.username = Some("john".to_string());
        assert_eq!(session.display_name(), Some("john"));

        session.user.username = Some(String::new());
        assert_eq!(session.display_name(), Some("John Doe"));
    }
}
