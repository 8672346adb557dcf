//! # Core Traits (Ports)
//!
//! Contracts the adapter crates implement. Repositories front the external
//! document store; the identity provider fronts the external auth service.
//! All return domain [`Result`]s so driver errors never leak upward.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, Contest, ContestPost, Viewer};

/// Persistence contract for contests.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContestRepo: Send + Sync {
    async fn get_contest(&self, id: Uuid) -> Result<Option<Contest>>;
    async fn list_contests(&self) -> Result<Vec<Contest>>;
    async fn create_contest(&self, contest: Contest) -> Result<()>;
}

/// Persistence contract for contest posts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn get_post(&self, id: Uuid) -> Result<Option<ContestPost>>;
    /// Posts of one contest, newest first.
    async fn list_posts(&self, contest_id: Uuid) -> Result<Vec<ContestPost>>;
    /// Posts still carrying a legacy `upvotes` field, across all contests.
    /// Drives the batch migration.
    async fn list_legacy_posts(&self) -> Result<Vec<ContestPost>>;
    async fn create_post(&self, post: ContestPost) -> Result<()>;
    /// Whole-record replace; the store's field-level last-write-wins
    /// governs concurrent writers.
    async fn update_post(&self, post: ContestPost) -> Result<()>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>>;
    /// Comments of one post, newest first.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>>;
    async fn create_comment(&self, comment: Comment) -> Result<()>;
    async fn delete_comment(&self, id: Uuid) -> Result<()>;
}

/// Identity contract fronting the external auth provider. Tests use the
/// static table implementation in auth-adapters rather than a mock.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token to a viewer. Absent or unverifiable tokens
    /// resolve to the anonymous viewer; reads are public.
    async fn resolve(&self, bearer_token: Option<&str>) -> Result<Viewer>;
}
