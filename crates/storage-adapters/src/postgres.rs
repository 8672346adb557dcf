//! Postgres implementation of the repository ports (feature `db-postgres`).
//!
//! Reaction maps, flag sets, and the legacy upvote set are stored as JSONB
//! columns and round-tripped through the same decode path as any other
//! document field. Writes are whole-record replaces; the concurrency
//! contract is the same last-write-wins the document store gives us.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

use domains::{
    AppError, Comment, CommentRepo, Contest, ContestPost, ContestRepo, PostRepo, Result,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(internal)?;
        MIGRATOR.run(&pool).await.map_err(internal)?;
        info!(max_connections, "connected to postgres");
        Ok(Self { pool })
    }
}

fn internal(err: impl std::fmt::Display) -> AppError {
    AppError::Internal(err.to_string())
}

fn row_to_contest(row: &PgRow) -> Result<Contest> {
    Ok(Contest {
        id: row.try_get("id").map_err(internal)?,
        title: row.try_get("title").map_err(internal)?,
        description: row.try_get("description").map_err(internal)?,
        unit: row.try_get("unit").map_err(internal)?,
        start_date: row.try_get("start_date").map_err(internal)?,
        end_date: row.try_get("end_date").map_err(internal)?,
        end_of_review_date: row.try_get("end_of_review_date").map_err(internal)?,
    })
}

fn row_to_post(row: &PgRow) -> Result<ContestPost> {
    let count: i64 = row.try_get("count").map_err(internal)?;
    let reactions: serde_json::Value = row.try_get("reactions").map_err(internal)?;
    let fishy_flags: serde_json::Value = row.try_get("fishy_flags").map_err(internal)?;
    let upvotes: Option<serde_json::Value> = row.try_get("upvotes").map_err(internal)?;
    Ok(ContestPost {
        id: row.try_get("id").map_err(internal)?,
        contest_id: row.try_get("contest_id").map_err(internal)?,
        user_id: row.try_get("user_id").map_err(internal)?,
        user_name: row.try_get("user_name").map_err(internal)?,
        count: u32::try_from(count)
            .map_err(|_| internal(format!("stored count {count} out of range")))?,
        timestamp: row.try_get("created_at").map_err(internal)?,
        description: row.try_get("description").map_err(internal)?,
        image_url: row.try_get("image_url").map_err(internal)?,
        reactions: serde_json::from_value(reactions).map_err(internal)?,
        fishy_flags: serde_json::from_value(fishy_flags).map_err(internal)?,
        upvotes: upvotes
            .map(serde_json::from_value)
            .transpose()
            .map_err(internal)?,
    })
}

fn row_to_comment(row: &PgRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id").map_err(internal)?,
        post_id: row.try_get("post_id").map_err(internal)?,
        user_id: row.try_get("user_id").map_err(internal)?,
        user_name: row.try_get("user_name").map_err(internal)?,
        text: row.try_get("text").map_err(internal)?,
        timestamp: row.try_get("created_at").map_err(internal)?,
    })
}

#[async_trait]
impl ContestRepo for PgStore {
    async fn get_contest(&self, id: Uuid) -> Result<Option<Contest>> {
        let row = sqlx::query("SELECT * FROM contests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        row.as_ref().map(row_to_contest).transpose()
    }

    async fn list_contests(&self) -> Result<Vec<Contest>> {
        let rows = sqlx::query("SELECT * FROM contests ORDER BY start_date DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        rows.iter().map(row_to_contest).collect()
    }

    async fn create_contest(&self, contest: Contest) -> Result<()> {
        sqlx::query(
            "INSERT INTO contests (id, title, description, unit, start_date, end_date, end_of_review_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(contest.id)
        .bind(contest.title)
        .bind(contest.description)
        .bind(contest.unit)
        .bind(contest.start_date)
        .bind(contest.end_date)
        .bind(contest.end_of_review_date)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }
}

#[async_trait]
impl PostRepo for PgStore {
    async fn get_post(&self, id: Uuid) -> Result<Option<ContestPost>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        row.as_ref().map(row_to_post).transpose()
    }

    async fn list_posts(&self, contest_id: Uuid) -> Result<Vec<ContestPost>> {
        let rows = sqlx::query(
            "SELECT * FROM posts WHERE contest_id = $1 ORDER BY created_at DESC",
        )
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(row_to_post).collect()
    }

    async fn list_legacy_posts(&self) -> Result<Vec<ContestPost>> {
        let rows = sqlx::query("SELECT * FROM posts WHERE upvotes IS NOT NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        rows.iter().map(row_to_post).collect()
    }

    async fn create_post(&self, post: ContestPost) -> Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, contest_id, user_id, user_name, count, created_at, description, image_url, reactions, fishy_flags, upvotes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(post.id)
        .bind(post.contest_id)
        .bind(post.user_id)
        .bind(post.user_name)
        .bind(i64::from(post.count))
        .bind(post.timestamp)
        .bind(post.description)
        .bind(post.image_url)
        .bind(serde_json::to_value(&post.reactions).map_err(internal)?)
        .bind(serde_json::to_value(&post.fishy_flags).map_err(internal)?)
        .bind(
            post.upvotes
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(internal)?,
        )
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn update_post(&self, post: ContestPost) -> Result<()> {
        let result = sqlx::query(
            "UPDATE posts
             SET count = $2, description = $3, image_url = $4, reactions = $5, fishy_flags = $6, upvotes = $7
             WHERE id = $1",
        )
        .bind(post.id)
        .bind(i64::from(post.count))
        .bind(post.description)
        .bind(post.image_url)
        .bind(serde_json::to_value(&post.reactions).map_err(internal)?)
        .bind(serde_json::to_value(&post.fishy_flags).map_err(internal)?)
        .bind(
            post.upvotes
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(internal)?,
        )
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post".into(), post.id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepo for PgStore {
    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        row.as_ref().map(row_to_comment).transpose()
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(row_to_comment).collect()
    }

    async fn create_comment(&self, comment: Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, user_id, user_name, text, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(comment.user_name)
        .bind(comment.text)
        .bind(comment.timestamp)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment".into(), id.to_string()));
        }
        Ok(())
    }
}
