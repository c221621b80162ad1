//! HTTP error mapping.
//!
//! Rejected sign-ins always produce the same `401 {"error":"CredentialsSignin"}` body.
//! Unexpected failures are logged and reported without detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use authn::AuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Auth(AuthError::CredentialsSignin) => {
                (StatusCode::UNAUTHORIZED, "CredentialsSignin".to_string())
            }
            ApiError::Auth(AuthError::InvalidToken) => {
                (StatusCode::UNAUTHORIZED, "SessionRequired".to_string())
            }
            ApiError::Auth(AuthError::Registration(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            _ => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
