//! HTTP routes for sign-in, sign-up, session reads and the admin page.
//!
//! The signed session token lives in the server-side session under
//! [`SESSION_TOKEN_KEY`]. Every session read verifies and renews it.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use authn::auth::{ProviderInfo, Registration, SESSION_TOKEN_KEY};
use authn::{AuthError, AuthService, CredentialClaim, Session, SignedSession, UserStore};

use crate::error::ApiError;
use crate::pages::admin_greeting;

pub struct AppState<S> {
    pub auth: Arc<AuthService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
        }
    }
}

pub fn router<S>(state: AppState<S>) -> Router
where
    S: UserStore + Send + Sync + 'static,
{
    Router::new()
        .route("/api/auth/callback/credentials", post(credentials_callback))
        .route("/api/auth/register", post(register))
        .route("/api/auth/session", get(current_session))
        .route("/api/auth/signout", post(sign_out))
        .route("/api/auth/providers", get(providers))
        .route("/admin", get(admin))
        .with_state(state)
}

async fn credentials_callback<S: UserStore + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    session: tower_sessions::Session,
    Json(claim): Json<CredentialClaim>,
) -> Result<Json<Session>, ApiError> {
    let signed = state.auth.sign_in(&claim).await?;
    Ok(Json(store_token(&session, signed).await?))
}

async fn register<S: UserStore + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    session: tower_sessions::Session,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let signed = state.auth.register(registration).await?;
    Ok((StatusCode::CREATED, Json(store_token(&session, signed).await?)))
}

async fn current_session<S: UserStore + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    session: tower_sessions::Session,
) -> Result<Response, ApiError> {
    Ok(match load_session(&state, &session).await? {
        Some(current) => Json(current).into_response(),
        None => Json(json!({})).into_response(),
    })
}

async fn sign_out(session: tower_sessions::Session) -> Result<StatusCode, ApiError> {
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn providers<S: UserStore + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> Json<Vec<ProviderInfo>> {
    Json(state.auth.config().providers())
}

async fn admin<S: UserStore + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    session: tower_sessions::Session,
) -> Result<String, ApiError> {
    let current = load_session(&state, &session).await?;
    Ok(admin_greeting(current.as_ref()))
}

/// Rotate the session id and store a freshly signed token.
async fn store_token(
    session: &tower_sessions::Session,
    signed: SignedSession,
) -> Result<Session, ApiError> {
    session.cycle_id().await?;
    session.insert(SESSION_TOKEN_KEY, &signed.token).await?;
    Ok(signed.session)
}

/// Refresh the stored token, if any. An invalid or expired token ends the session.
async fn load_session<S: UserStore>(
    state: &AppState<S>,
    session: &tower_sessions::Session,
) -> Result<Option<Session>, ApiError> {
    let Some(token) = session.get::<String>(SESSION_TOKEN_KEY).await? else {
        return Ok(None);
    };

    match state.auth.refresh(&token) {
        Ok(signed) => {
            session.insert(SESSION_TOKEN_KEY, &signed.token).await?;
            Ok(Some(signed.session))
        }
        Err(AuthError::InvalidToken) => {
            tracing::debug!("discarding invalid session token");
            session.flush().await?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use authn::auth::hash_password;
    use authn::{AccountKind, AuthConfig, MemoryUserStore, Principal};

    fn seeded() -> MemoryUserStore {
        let store = MemoryUserStore::new();
        store
            .insert(Principal {
                id: "1".to_string(),
                username: Some("john".to_string()),
                email: "john@email.com".to_string(),
                name: Some("John Smith".to_string()),
                image: None,
                account: AccountKind::Credentials {
                    password_hash: hash_password("secret").unwrap(),
                },
            })
            .unwrap();
        store
    }

    fn app(secret: &str, users: MemoryUserStore, sessions: MemoryStore) -> Router {
        let auth = AuthService::new(users, AuthConfig::new(secret).unwrap()).unwrap();
        router(AppState {
            auth: Arc::new(auth),
        })
        .layer(SessionManagerLayer::new(sessions))
    }

    struct Reply {
        status: StatusCode,
        cookie: Option<String>,
        body: Vec<u8>,
    }

    impl Reply {
        fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
        }

        fn text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    async fn call(
        router: &Router,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
            None => Body::empty(),
        };
        let resp = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        Reply {
            status,
            cookie,
            body: bytes.to_vec(),
        }
    }

    async fn sign_in(router: &Router) -> String {
        let reply = call(
            router,
            "POST",
            "/api/auth/callback/credentials",
            None,
            Some(json!({"email": "john@email.com", "password": "secret"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.cookie.unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_returns_session() {
        let r = app("test-secret", seeded(), MemoryStore::default());
        let reply = call(
            &r,
            "POST",
            "/api/auth/callback/credentials",
            None,
            Some(json!({"email": "john@email.com", "password": "secret"})),
        )
        .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.cookie.is_some());
        let body = reply.json();
        assert_eq!(body["user"]["username"], "john");
        assert_eq!(body["user"]["email"], "john@email.com");
        assert!(body["expires"].is_string());
    }

    #[tokio::test]
    async fn test_rejections_are_opaque() {
        let r = app("test-secret", seeded(), MemoryStore::default());
        let attempts = [
            json!({"email": "jane@email.com", "password": "secret"}),
            json!({"email": "john@email.com", "password": "wrong"}),
            json!({"email": "john@email.com"}),
        ];
        for attempt in attempts {
            let reply = call(&r, "POST", "/api/auth/callback/credentials", None, Some(attempt)).await;
            assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
            assert_eq!(reply.json(), json!({"error": "CredentialsSignin"}));
            assert!(reply.cookie.is_none());
        }
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let r = app("test-secret", seeded(), MemoryStore::default());

        let reply = call(&r, "GET", "/api/auth/session", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json(), json!({}));

        let cookie = sign_in(&r).await;
        let reply = call(&r, "GET", "/api/auth/session", Some(&cookie), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["user"]["username"], "john");

        let reply = call(&r, "GET", "/admin", Some(&cookie), None).await;
        assert_eq!(reply.text(), "admin page - welcome back john");
    }

    #[tokio::test]
    async fn test_sign_out() {
        let r = app("test-secret", seeded(), MemoryStore::default());
        let cookie = sign_in(&r).await;

        let reply = call(&r, "POST", "/api/auth/signout", Some(&cookie), None).await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);

        let reply = call(&r, "GET", "/api/auth/session", Some(&cookie), None).await;
        assert_eq!(reply.json(), json!({}));
        let reply = call(&r, "GET", "/admin", Some(&cookie), None).await;
        assert_eq!(reply.text(), "Please login to see this page");
    }

    #[tokio::test]
    async fn test_invalid_token_is_flushed() {
        let sessions = MemoryStore::default();
        let users = seeded();
        let issuer = app("test-secret", users.clone(), sessions.clone());
        let rotated = app("rotated-secret", users, sessions);

        let cookie = sign_in(&issuer).await;

        // the stored token no longer verifies under the new secret
        let reply = call(&rotated, "GET", "/api/auth/session", Some(&cookie), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json(), json!({}));

        // and the session it lived in is gone
        let reply = call(&issuer, "GET", "/api/auth/session", Some(&cookie), None).await;
        assert_eq!(reply.json(), json!({}));
    }

    #[tokio::test]
    async fn test_register() {
        let r = app("test-secret", seeded(), MemoryStore::default());

        let reply = call(
            &r,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"email": "jane@email.com", "password": "correct horse", "username": "jane"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.json()["user"]["username"], "jane");
        assert!(reply.cookie.is_some());

        let reply = call(
            &r,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"email": "other@email.com", "password": "correct horse", "username": "john"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert!(reply.json()["error"].is_string());
    }

    #[tokio::test]
    async fn test_providers() {
        let r = app("test-secret", seeded(), MemoryStore::default());
        let reply = call(&r, "GET", "/api/auth/providers", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.json(),
            json!([{"id": "credentials", "name": "Credentials", "type": "credentials"}])
        );
    }
}
