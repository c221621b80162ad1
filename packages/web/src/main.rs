//! HTTP front end for the `authn` credential authenticator.

use std::sync::Arc;

use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use authn::db::PgUserStore;
use authn::{AuthConfig, AuthService};

mod error;
mod pages;
mod routes;

use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AuthConfig::from_env()?;
    for provider in config.providers() {
        tracing::info!(provider = provider.id, kind = provider.kind, "provider enabled");
    }

    // Initialize database pool
    let pool = authn::db::get_pool().await?;

    // Run migrations
    authn::db::migrate(pool).await?;

    // Create session store
    let session_store = PostgresStore::new(pool.clone());
    session_store.migrate().await?;

    let secure = std::env::var("SESSION_COOKIE_SECURE")
        .map(|v| v == "true")
        .unwrap_or(false);
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            config.session_max_age.num_seconds(),
        )));

    let auth = AuthService::new(PgUserStore::new(pool.clone()), config)?;
    let router = routes::router(AppState {
        auth: Arc::new(auth),
    })
    .layer(session_layer);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
