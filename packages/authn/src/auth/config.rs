//! Authentication configuration from environment variables.
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `AUTH_SECRET` (or `NEXTAUTH_SECRET`) | yes | token signing secret |
//! | `AUTH_SESSION_MAX_AGE` | no | session lifetime in seconds, default 30 days |
//! | `GITHUB_CLIENT_ID` / `GITHUB_CLIENT_SECRET` | no | enables the GitHub provider |
//! | `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` | no | enables the Google provider |
//! | `AUTH_REDIRECT_URI` | no | base callback URL for OAuth providers |

use std::fmt;

use chrono::Duration;
use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use serde::Serialize;

use crate::error::AuthError;
use crate::models::CREDENTIALS_PROVIDER;

const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/api/auth/callback";

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub redirect_url: RedirectUrl,
}

impl OAuthConfig {
    /// GitHub provider, if `GITHUB_CLIENT_ID` is set.
    pub fn github<F>(lookup: &F) -> Result<Option<Self>, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(
            lookup,
            "github",
            "GitHub",
            "GITHUB",
            "https://github.com/login/oauth/authorize",
            "https://github.com/login/oauth/access_token",
        )
    }

    /// Google provider, if `GOOGLE_CLIENT_ID` is set.
    pub fn google<F>(lookup: &F) -> Result<Option<Self>, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(
            lookup,
            "google",
            "Google",
            "GOOGLE",
            "https://accounts.google.com/o/oauth2/v2/auth",
            "https://oauth2.googleapis.com/token",
        )
    }

    fn from_lookup<F>(
        lookup: &F,
        id: &'static str,
        name: &'static str,
        prefix: &str,
        auth_url: &str,
        token_url: &str,
    ) -> Result<Option<Self>, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(client_id) = non_empty(lookup, &format!("{}_CLIENT_ID", prefix)) else {
            return Ok(None);
        };
        let client_secret = non_empty(lookup, &format!("{}_CLIENT_SECRET", prefix))
            .ok_or_else(|| AuthError::Config(format!("{}_CLIENT_SECRET not set", prefix)))?;
        let redirect_uri = non_empty(lookup, "AUTH_REDIRECT_URI")
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        Ok(Some(Self {
            id,
            name,
            client_id: ClientId::new(client_id),
            client_secret: ClientSecret::new(client_secret),
            auth_url: AuthUrl::new(auth_url.to_string())
                .map_err(|e| AuthError::Config(e.to_string()))?,
            token_url: TokenUrl::new(token_url.to_string())
                .map_err(|e| AuthError::Config(e.to_string()))?,
            redirect_url: RedirectUrl::new(format!("{}/{}", redirect_uri.trim_end_matches('/'), id))
                .map_err(|e| AuthError::Config(e.to_string()))?,
        }))
    }
}

/// Custom page routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pages {
    pub sign_in: String,
    pub new_user: String,
}

impl Default for Pages {
    fn default() -> Self {
        Self {
            sign_in: "/sign-in".to_string(),
            new_user: "/sign-up".to_string(),
        }
    }
}

/// A provider as advertised to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Everything the authentication layer reads from the deployment environment.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub session_max_age: Duration,
    pub pages: Pages,
    pub github: Option<OAuthConfig>,
    pub google: Option<OAuthConfig>,
}

impl AuthConfig {
    /// Config with only the credentials provider.
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::Config("AUTH_SECRET must not be empty".to_string()));
        }
        Ok(Self {
            secret,
            session_max_age: Duration::seconds(DEFAULT_SESSION_MAX_AGE_SECS),
            pages: Pages::default(),
            github: None,
            google: None,
        })
    }

    /// Read the config from the process environment, loading `.env` first.
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = non_empty(&lookup, "AUTH_SECRET")
            .or_else(|| non_empty(&lookup, "NEXTAUTH_SECRET"))
            .ok_or_else(|| AuthError::Config("AUTH_SECRET not set".to_string()))?;

        let mut config = Self::new(secret)?;

        if let Some(max_age) = non_empty(&lookup, "AUTH_SESSION_MAX_AGE") {
            let secs: i64 = max_age
                .parse()
                .map_err(|_| AuthError::Config(format!("invalid AUTH_SESSION_MAX_AGE: {}", max_age)))?;
            if secs <= 0 {
                return Err(AuthError::Config("AUTH_SESSION_MAX_AGE must be positive".to_string()));
            }
            config.session_max_age = Duration::seconds(secs);
        }

        config.github = OAuthConfig::github(&lookup)?;
        config.google = OAuthConfig::google(&lookup)?;
        Ok(config)
    }

    /// Providers enabled by this config, credentials first.
    pub fn providers(&self) -> Vec<ProviderInfo> {
        let mut providers = vec![ProviderInfo {
            id: CREDENTIALS_PROVIDER,
            name: "Credentials",
            kind: "credentials",
        }];
        providers.extend(
            [&self.github, &self.google]
                .into_iter()
                .flatten()
                .map(|oauth| ProviderInfo {
                    id: oauth.id,
                    name: oauth.name,
                    kind: "oauth",
                }),
        );
        providers
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("session_max_age", &self.session_max_age)
            .field("pages", &self.pages)
            .field("github", &self.github)
            .field("google", &self.google)
            .finish()
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}
