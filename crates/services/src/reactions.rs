//! Reaction and flag toggling: load, reconcile, persist.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use domains::reactions::{toggle_flag, toggle_reaction, ReactionToggle};
use domains::{AppError, ContestPost, PostRepo, Result, Viewer};

pub struct ReactionService {
    posts: Arc<dyn PostRepo>,
}

impl ReactionService {
    pub fn new(posts: Arc<dyn PostRepo>) -> Self {
        Self { posts }
    }

    /// Applies `viewer`'s reaction toggle and persists the rewritten record.
    /// The self-action and anonymous gates live in the reconciler; a
    /// rejected toggle writes nothing.
    pub async fn toggle_reaction(
        &self,
        post_id: Uuid,
        viewer: &Viewer,
        emoji: &str,
    ) -> Result<ReactionToggle> {
        let mut post = self.require_post(post_id).await?;
        let outcome = toggle_reaction(&mut post, viewer, emoji)?;
        self.posts.update_post(post).await?;
        info!(%post_id, user = %viewer.user_name, emoji, ?outcome, "reaction toggled");
        Ok(outcome)
    }

    /// Toggles `viewer`'s fishy flag; returns whether the post is flagged
    /// by them afterwards.
    pub async fn toggle_flag(&self, post_id: Uuid, viewer: &Viewer) -> Result<bool> {
        let mut post = self.require_post(post_id).await?;
        let flagged = toggle_flag(&mut post, viewer)?;
        self.posts.update_post(post).await?;
        info!(%post_id, user = %viewer.user_name, flagged, "fishy flag toggled");
        Ok(flagged)
    }

    async fn require_post(&self, post_id: Uuid) -> Result<ContestPost> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".into(), post_id.to_string()))
    }
}
