//! State shared across all request handlers.

use std::sync::Arc;

use domains::{CommentRepo, ContestRepo, IdentityProvider, PostRepo};
use services::{CommentService, LeaderboardService, PostService, ReactionService};

use crate::metrics::Metrics;

pub struct AppState {
    pub contests: Arc<dyn ContestRepo>,
    pub identity: Arc<dyn IdentityProvider>,
    pub posts: PostService,
    pub reactions: ReactionService,
    pub comments: CommentService,
    pub leaderboard: LeaderboardService,
    pub metrics: Metrics,
}

impl AppState {
    /// Assembles the service graph over whichever adapters the binary
    /// selected. The batch migration is deliberately absent: it belongs to
    /// the migrate binary, not the request path.
    pub fn new(
        contests: Arc<dyn ContestRepo>,
        posts: Arc<dyn PostRepo>,
        comments: Arc<dyn CommentRepo>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            posts: PostService::new(contests.clone(), posts.clone()),
            reactions: ReactionService::new(posts.clone()),
            leaderboard: LeaderboardService::new(contests.clone(), posts.clone()),
            comments: CommentService::new(posts, comments),
            contests,
            identity,
            metrics: Metrics::new(),
        }
    }
}
