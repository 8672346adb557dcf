//! # Tally-Board Binary
//!
//! Assembles the application from the adapters selected at compile time
//! and serves the HTTP API.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use api_adapters::{routes, AppState};
use configs::AppConfig;
use domains::{CommentRepo, ContestRepo, IdentityProvider, PostRepo};

#[cfg(not(feature = "auth-jwt"))]
use auth_adapters::StaticIdentityProvider;
#[cfg(feature = "auth-jwt")]
use auth_adapters::JwtIdentityProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let (contests, posts, comments) = build_store(&config).await?;
    let identity = build_identity(&config);

    let state = Arc::new(AppState::new(contests, posts, comments, identity));
    let app = routes::router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .context("binding listen address")?;
    tracing::info!(addr = %listener.local_addr()?, "tally-board listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(feature = "db-postgres")]
async fn build_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn ContestRepo>, Arc<dyn PostRepo>, Arc<dyn CommentRepo>)> {
    use secrecy::ExposeSecret;
    use storage_adapters::postgres::PgStore;

    let url = config
        .database
        .url
        .as_ref()
        .context("database.url is required with the db-postgres feature")?;
    let store = Arc::new(
        PgStore::connect(url.expose_secret(), config.database.max_connections).await?,
    );
    let contests: Arc<dyn ContestRepo> = store.clone();
    let posts: Arc<dyn PostRepo> = store.clone();
    let comments: Arc<dyn CommentRepo> = store;
    Ok((contests, posts, comments))
}

#[cfg(not(feature = "db-postgres"))]
async fn build_store(
    _config: &AppConfig,
) -> anyhow::Result<(Arc<dyn ContestRepo>, Arc<dyn PostRepo>, Arc<dyn CommentRepo>)> {
    use storage_adapters::MemoryStore;

    tracing::warn!("db-postgres feature disabled; records live in memory only");
    let store = Arc::new(MemoryStore::new());
    let contests: Arc<dyn ContestRepo> = store.clone();
    let posts: Arc<dyn PostRepo> = store.clone();
    let comments: Arc<dyn CommentRepo> = store;
    Ok((contests, posts, comments))
}

#[cfg(feature = "auth-jwt")]
fn build_identity(config: &AppConfig) -> Arc<dyn IdentityProvider> {
    Arc::new(JwtIdentityProvider::new(&config.auth.jwt_secret))
}

#[cfg(not(feature = "auth-jwt"))]
fn build_identity(_config: &AppConfig) -> Arc<dyn IdentityProvider> {
    // every request is anonymous without a verifier; read-only deployment
    Arc::new(StaticIdentityProvider::new())
}
