//! # configs
//!
//! One [`AppConfig`] is built at process start — layered from an optional
//! `tally-board.toml` and `TALLY__`-prefixed environment variables — and
//! injected into whatever needs it. Business logic never reads the
//! environment on its own.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string; unused when the in-memory store is
    /// selected at the binary level.
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 key shared with the identity provider.
    pub jwt_secret: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Loads configuration once. Defaults keep a bare checkout bootable;
    /// the default JWT secret is for development only and is logged loudly.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.max_connections", 8_i64)?
            .set_default("auth.jwt_secret", DEV_JWT_SECRET)?
            .add_source(config::File::with_name("tally-board").required(false))
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let app: Self = settings.try_deserialize()?;
        if is_dev_secret(&app.auth.jwt_secret) {
            warn!("auth.jwt_secret is the development default; set TALLY__AUTH__JWT_SECRET");
        }
        Ok(app)
    }
}

const DEV_JWT_SECRET: &str = "dev-only-secret";

fn is_dev_secret(secret: &SecretString) -> bool {
    use secrecy::ExposeSecret;
    secret.expose_secret() == DEV_JWT_SECRET
}
