//! Seeds a development database with a demo contest, a handful of entries,
//! and one legacy-upvote post so the migration tooling has something to
//! chew on. Run once against an empty database.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use configs::AppConfig;
use domains::{Comment, Contest, ContestPost, PostDraft, Viewer};
use domains::{CommentRepo, ContestRepo, PostRepo};
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

    let now = Utc::now();
    let contest = Contest::new(
        "Summer Pushup Sprint",
        Some("Log every set. Most pushups by Sunday wins.".into()),
        "pushups",
        now - Duration::days(1),
        now + Duration::days(6),
        Some(now + Duration::days(8)),
    )?;
    store.create_contest(contest.clone()).await?;
    tracing::info!(contest_id = %contest.id, "seeded contest");

    let avery = Viewer::signed_in("seed-avery", "Avery");
    let brook = Viewer::signed_in("seed-brook", "Brook");

    let first = ContestPost::new(
        &contest,
        &avery,
        PostDraft { count: 40, description: Some("warmup sets".into()), ..Default::default() },
        now - Duration::hours(20),
    )?;
    let second = ContestPost::new(
        &contest,
        &brook,
        PostDraft { count: 55, ..Default::default() },
        now - Duration::hours(4),
    )?;

    // a pre-reaction-model record, exactly as old clients wrote it
    let mut legacy = ContestPost::new(
        &contest,
        &avery,
        PostDraft { count: 25, ..Default::default() },
        now - Duration::hours(22),
    )?;
    legacy.upvotes = Some(["seed-brook".to_string()].into());

    for post in [&first, &second, &legacy] {
        store.create_post(post.clone()).await?;
    }

    let comment = Comment::new(second.id, &avery, "monster set 💪", now - Duration::hours(3))?;
    store.create_comment(comment).await?;

    tracing::info!("seed complete: 1 contest, 3 posts (1 legacy), 1 comment");
    Ok(())
}
