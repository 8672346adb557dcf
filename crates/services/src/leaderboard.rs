//! Leaderboard aggregation over a contest's posts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use domains::{AppError, ContestPost, ContestRepo, PostRepo, Result};

/// One user's aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub user_id: String,
    pub user_name: String,
    /// Sum of all logged counts.
    pub total: u64,
    pub entries: usize,
    pub latest_entry: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub standings: Vec<Standing>,
    /// Head of the standings, surfaced only once the posting window has
    /// closed.
    pub winner: Option<Standing>,
}

/// Folds posts into ordered standings: total descending, ties broken by
/// whoever reached their latest entry first.
pub fn aggregate(posts: &[ContestPost]) -> Vec<Standing> {
    let mut by_user: HashMap<&str, Standing> = HashMap::new();
    for post in posts {
        by_user
            .entry(&post.user_id)
            .and_modify(|standing| {
                standing.total += u64::from(post.count);
                standing.entries += 1;
                if post.timestamp > standing.latest_entry {
                    standing.latest_entry = post.timestamp;
                    standing.user_name = post.user_name.clone();
                }
            })
            .or_insert_with(|| Standing {
                user_id: post.user_id.clone(),
                user_name: post.user_name.clone(),
                total: u64::from(post.count),
                entries: 1,
                latest_entry: post.timestamp,
            });
    }
    let mut standings: Vec<Standing> = by_user.into_values().collect();
    standings.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then(a.latest_entry.cmp(&b.latest_entry))
            .then(a.user_id.cmp(&b.user_id))
    });
    standings
}

pub struct LeaderboardService {
    contests: Arc<dyn ContestRepo>,
    posts: Arc<dyn PostRepo>,
}

impl LeaderboardService {
    pub fn new(contests: Arc<dyn ContestRepo>, posts: Arc<dyn PostRepo>) -> Self {
        Self { contests, posts }
    }

    pub async fn standings(&self, contest_id: Uuid, now: DateTime<Utc>) -> Result<Leaderboard> {
        let contest = self
            .contests
            .get_contest(contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest".into(), contest_id.to_string()))?;
        let posts = self.posts.list_posts(contest_id).await?;
        let standings = aggregate(&posts);
        let winner = contest
            .should_show_winner_at(now)
            .then(|| standings.first().cloned())
            .flatten();
        Ok(Leaderboard { standings, winner })
    }
}
