//! Batch migration of the legacy `upvotes` field into the reaction model.
//!
//! The read-time shim in the reconciler keeps old records presentable; this
//! routine is the explicit operation that persists the merge so the shim
//! can eventually retire. Safe to re-run: a second pass finds nothing left
//! to migrate.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use domains::reactions::merge_legacy_upvotes;
use domains::{PostRepo, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Posts that still carried the legacy field.
    pub scanned: usize,
    /// Posts rewritten with the merged reaction map.
    pub migrated: usize,
    /// Posts whose rewrite failed; left for the next run.
    pub failed: usize,
}

pub struct MigrationService {
    posts: Arc<dyn PostRepo>,
}

impl MigrationService {
    pub fn new(posts: Arc<dyn PostRepo>) -> Self {
        Self { posts }
    }

    /// Merges every remaining `upvotes` set into `reactions["👍"]` (the
    /// reaction model wins when the key already exists) and clears the
    /// legacy field. One failed write does not abort the batch.
    pub async fn migrate_legacy_upvotes(&self) -> Result<MigrationReport> {
        let legacy = self.posts.list_legacy_posts().await?;
        let mut report = MigrationReport { scanned: legacy.len(), ..Default::default() };

        for mut post in legacy {
            let post_id = post.id;
            if !merge_legacy_upvotes(&mut post) {
                continue;
            }
            match self.posts.update_post(post).await {
                Ok(()) => report.migrated += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(%post_id, %err, "legacy upvote migration failed for post");
                }
            }
        }

        info!(
            scanned = report.scanned,
            migrated = report.migrated,
            failed = report.failed,
            "legacy upvote migration pass finished"
        );
        Ok(report)
    }
}
