//! Comment lifecycle and the collapse presentation policy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use domains::{AppError, Comment, CommentRepo, PostRepo, Result, Viewer};

/// Threads longer than this collapse to their most recent entries behind an
/// expand toggle.
pub const COLLAPSED_COMMENT_COUNT: usize = 3;

/// A post's comments in display order (newest first), with the collapse
/// hint the UI uses. Presentation policy, not a core invariant.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    pub comments: Vec<Comment>,
    pub collapsible: bool,
}

impl CommentThread {
    /// The slice shown in the collapsed state.
    pub fn visible(&self, expanded: bool) -> &[Comment] {
        if expanded || self.comments.len() <= COLLAPSED_COMMENT_COUNT {
            &self.comments
        } else {
            &self.comments[..COLLAPSED_COMMENT_COUNT]
        }
    }
}

pub struct CommentService {
    posts: Arc<dyn PostRepo>,
    comments: Arc<dyn CommentRepo>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepo>, comments: Arc<dyn CommentRepo>) -> Self {
        Self { posts, comments }
    }

    /// Adds a comment by an authenticated viewer; the text contract is
    /// enforced before anything is written.
    pub async fn add(
        &self,
        post_id: Uuid,
        viewer: &Viewer,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment> {
        if self.posts.get_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("Post".into(), post_id.to_string()));
        }
        let comment = Comment::new(post_id, viewer, text, now)?;
        self.comments.create_comment(comment.clone()).await?;
        info!(comment_id = %comment.id, %post_id, user = %viewer.user_name, "comment added");
        Ok(comment)
    }

    /// Deletes a comment if `viewer` is its author or an admin.
    pub async fn delete(&self, comment_id: Uuid, viewer: &Viewer) -> Result<()> {
        let comment = self
            .comments
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment".into(), comment_id.to_string()))?;
        if !comment.can_delete(viewer) {
            return Err(AppError::Unauthorized(
                "only the author or an admin can delete a comment".into(),
            ));
        }
        self.comments.delete_comment(comment_id).await?;
        info!(%comment_id, user = %viewer.user_name, "comment deleted");
        Ok(())
    }

    /// The post's thread, newest first.
    pub async fn thread(&self, post_id: Uuid) -> Result<CommentThread> {
        let mut comments = self.comments.list_comments(post_id).await?;
        comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let collapsible = comments.len() > COLLAPSED_COMMENT_COUNT;
        Ok(CommentThread { comments, collapsible })
    }
}
