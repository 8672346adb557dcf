//! In-memory implementation of the repository ports.
//!
//! Backs development, seeding, and the cross-crate tests. Concurrency
//! mirrors the real store's behavior: whole-record last-write-wins, no
//! transactions.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{
    AppError, Comment, CommentRepo, Contest, ContestPost, ContestRepo, PostRepo, Result,
};

use crate::docs::{self, Quarantined};

#[derive(Default)]
pub struct MemoryStore {
    contests: DashMap<Uuid, Contest>,
    posts: DashMap<Uuid, ContestPost>,
    comments: DashMap<Uuid, Comment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a raw JSON export (a dump of the previous app's document
    /// store) through the boundary decoders. Malformed documents are
    /// quarantined and reported back, not loaded.
    pub fn from_documents(
        contests: &[serde_json::Value],
        posts: &[serde_json::Value],
        comments: &[serde_json::Value],
    ) -> (Self, Vec<Quarantined>) {
        let store = Self::new();
        let mut quarantined = Vec::new();

        let (records, bad) = docs::decode_batch(contests, docs::decode_contest);
        quarantined.extend(bad);
        for contest in records {
            store.contests.insert(contest.id, contest);
        }

        let (records, bad) = docs::decode_batch(posts, docs::decode_post);
        quarantined.extend(bad);
        for post in records {
            store.posts.insert(post.id, post);
        }

        let (records, bad) = docs::decode_batch(comments, docs::decode_comment);
        quarantined.extend(bad);
        for comment in records {
            store.comments.insert(comment.id, comment);
        }

        (store, quarantined)
    }
}

#[async_trait]
impl ContestRepo for MemoryStore {
    async fn get_contest(&self, id: Uuid) -> Result<Option<Contest>> {
        Ok(self.contests.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_contests(&self) -> Result<Vec<Contest>> {
        let mut contests: Vec<Contest> =
            self.contests.iter().map(|entry| entry.value().clone()).collect();
        contests.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(contests)
    }

    async fn create_contest(&self, contest: Contest) -> Result<()> {
        if self.contests.contains_key(&contest.id) {
            return Err(AppError::Conflict(format!("contest {} exists", contest.id)));
        }
        self.contests.insert(contest.id, contest);
        Ok(())
    }
}

#[async_trait]
impl PostRepo for MemoryStore {
    async fn get_post(&self, id: Uuid) -> Result<Option<ContestPost>> {
        Ok(self.posts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_posts(&self, contest_id: Uuid) -> Result<Vec<ContestPost>> {
        let mut posts: Vec<ContestPost> = self
            .posts
            .iter()
            .filter(|entry| entry.contest_id == contest_id)
            .map(|entry| entry.value().clone())
            .collect();
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(posts)
    }

    async fn list_legacy_posts(&self) -> Result<Vec<ContestPost>> {
        Ok(self
            .posts
            .iter()
            .filter(|entry| entry.upvotes.is_some())
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn create_post(&self, post: ContestPost) -> Result<()> {
        if self.posts.contains_key(&post.id) {
            return Err(AppError::Conflict(format!("post {} exists", post.id)));
        }
        self.posts.insert(post.id, post);
        Ok(())
    }

    async fn update_post(&self, post: ContestPost) -> Result<()> {
        if !self.posts.contains_key(&post.id) {
            return Err(AppError::NotFound("Post".into(), post.id.to_string()));
        }
        self.posts.insert(post.id, post);
        Ok(())
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.comments.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|entry| entry.post_id == post_id)
            .map(|entry| entry.value().clone())
            .collect();
        comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(comments)
    }

    async fn create_comment(&self, comment: Comment) -> Result<()> {
        if self.comments.contains_key(&comment.id) {
            return Err(AppError::Conflict(format!("comment {} exists", comment.id)));
        }
        self.comments.insert(comment.id, comment);
        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        if self.comments.remove(&id).is_none() {
            return Err(AppError::NotFound("Comment".into(), id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use domains::{PostDraft, Viewer};

    use super::*;

    fn contest() -> Contest {
        let now = Utc::now();
        Contest::new(
            "Row Week",
            None,
            "meters",
            now - Duration::days(1),
            now + Duration::days(6),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn contest_round_trip() {
        let store = MemoryStore::new();
        let contest = contest();
        store.create_contest(contest.clone()).await.unwrap();
        assert!(matches!(
            store.create_contest(contest.clone()).await,
            Err(AppError::Conflict(_))
        ));
        let loaded = store.get_contest(contest.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Row Week");
    }

    #[tokio::test]
    async fn posts_list_newest_first_and_legacy_filter_works() {
        let store = MemoryStore::new();
        let contest = contest();
        let viewer = Viewer::signed_in("u1", "Una");
        let now = Utc::now();

        let older = ContestPost::new(&contest, &viewer, PostDraft { count: 500, ..Default::default() }, now - Duration::hours(2)).unwrap();
        let mut legacy = ContestPost::new(&contest, &viewer, PostDraft { count: 250, ..Default::default() }, now - Duration::hours(1)).unwrap();
        legacy.upvotes = Some(["u2".to_string()].into());

        store.create_post(older.clone()).await.unwrap();
        store.create_post(legacy.clone()).await.unwrap();

        let posts = store.list_posts(contest.id).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, legacy.id);

        let found = store.list_legacy_posts().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, legacy.id);
    }

    #[tokio::test]
    async fn snapshot_import_quarantines_bad_documents() {
        let contest_doc = serde_json::json!({
            "id": "11f3b3f2-8c3e-4f89-9d8a-0c1d2e3f4a5b",
            "title": "Imported Sprint",
            "unit": "laps",
            "start_date": "2024-07-04T12:00:00Z",
            "end_date": "2024-07-04T13:00:00Z"
        });
        let good_post = serde_json::json!({
            "id": "7b3d9d0a-5f5a-4d3c-9a9e-2f6e1a0b4c8d",
            "contest_id": "11f3b3f2-8c3e-4f89-9d8a-0c1d2e3f4a5b",
            "user_id": "u1",
            "count": 12,
            "timestamp": "2024-07-04T12:30:00Z",
            "upvotes": ["u2"]
        });
        let bad_post = serde_json::json!({ "id": "not-even-a-uuid", "count": 3 });

        let (store, quarantined) =
            MemoryStore::from_documents(&[contest_doc], &[good_post, bad_post], &[]);
        assert_eq!(quarantined.len(), 1);

        let contest_id = "11f3b3f2-8c3e-4f89-9d8a-0c1d2e3f4a5b".parse().unwrap();
        let posts = store.list_posts(contest_id).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].has_legacy_upvotes());
    }

    #[tokio::test]
    async fn update_requires_an_existing_post() {
        let store = MemoryStore::new();
        let contest = contest();
        let post = ContestPost::new(
            &contest,
            &Viewer::signed_in("u1", "Una"),
            PostDraft { count: 1, ..Default::default() },
            Utc::now(),
        )
        .unwrap();
        assert!(matches!(
            store.update_post(post.clone()).await,
            Err(AppError::NotFound(_, _))
        ));
        store.create_post(post.clone()).await.unwrap();
        let mut updated = post.clone();
        updated.fishy_flags.insert("u2".into());
        store.update_post(updated).await.unwrap();
        let loaded = store.get_post(post.id).await.unwrap().unwrap();
        assert!(loaded.fishy_flags.contains("u2"));
    }
}
