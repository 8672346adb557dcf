//! Posting flow: phase gate → validate → persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use domains::reactions::{self, NormalizedReactions};
use domains::{
    AppError, Contest, ContestPost, ContestRepo, PostDraft, PostRepo, Result, Viewer,
};

/// A post projected for one viewer: the normalized reaction state plus the
/// viewer's own reaction and flag status.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: ContestPost,
    pub reactions_view: NormalizedReactions,
    pub viewer_reaction: Option<String>,
    pub viewer_has_flagged: bool,
}

impl PostView {
    pub fn project(post: ContestPost, viewer: &Viewer) -> Self {
        let view = reactions::normalize(&post);
        let viewer_reaction = view.find_user_reaction(&viewer.user_id).map(str::to_string);
        let viewer_has_flagged = !viewer.anonymous && view.has_flagged(&viewer.user_id);
        Self {
            post,
            reactions_view: view,
            viewer_reaction,
            viewer_has_flagged,
        }
    }
}

pub struct PostService {
    contests: Arc<dyn ContestRepo>,
    posts: Arc<dyn PostRepo>,
}

impl PostService {
    pub fn new(contests: Arc<dyn ContestRepo>, posts: Arc<dyn PostRepo>) -> Self {
        Self { contests, posts }
    }

    /// Logs an entry for `viewer`. Rejected outside the active phase — the
    /// posting window is re-evaluated against `now` on every call, never
    /// cached.
    pub async fn log_entry(
        &self,
        contest_id: Uuid,
        viewer: &Viewer,
        draft: PostDraft,
        now: DateTime<Utc>,
    ) -> Result<ContestPost> {
        let contest = self.require_contest(contest_id).await?;
        if !contest.can_post_at(now) {
            return Err(AppError::ValidationError(format!(
                "contest '{}' is not accepting entries (phase: {:?})",
                contest.title,
                contest.phase_at(now)
            )));
        }
        let post = ContestPost::new(&contest, viewer, draft, now)?;
        self.posts.create_post(post.clone()).await?;
        info!(post_id = %post.id, contest_id = %contest_id, user = %post.user_name, count = post.count, "entry logged");
        Ok(post)
    }

    /// The contest's feed as `viewer` sees it, newest first.
    pub async fn feed(&self, contest_id: Uuid, viewer: &Viewer) -> Result<Vec<PostView>> {
        self.require_contest(contest_id).await?;
        let mut posts = self.posts.list_posts(contest_id).await?;
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(posts
            .into_iter()
            .map(|post| PostView::project(post, viewer))
            .collect())
    }

    async fn require_contest(&self, contest_id: Uuid) -> Result<Contest> {
        self.contests
            .get_contest(contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest".into(), contest_id.to_string()))
    }
}
