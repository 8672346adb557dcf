//! Persists the legacy `upvotes` → `reactions["👍"]` merge across the
//! whole database. Idempotent; rerunning after a clean pass is a no-op.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use configs::AppConfig;
use services::MigrationService;
use storage_adapters::postgres::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    let url = config.database.url.as_ref().context("database.url is required")?;
    let store = Arc::new(
        PgStore::connect(url.expose_secret(), config.database.max_connections).await?,
    );

    let report = MigrationService::new(store).migrate_legacy_upvotes().await?;
    tracing::info!(
        scanned = report.scanned,
        migrated = report.migrated,
        failed = report.failed,
        "migration finished"
    );
    if report.failed > 0 {
        anyhow::bail!("{} posts failed to migrate; rerun to retry", report.failed);
    }
    Ok(())
}
