//! Request handlers: resolve the viewer, call the service, shape the JSON.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::reactions::ReactionToggle;
use domains::{Comment, Contest, ContestPost, Phase, PostDraft, Viewer};
use services::{CommentThread, Leaderboard, PostView};

use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// A contest projected at request time. The phase and gating booleans are
/// re-evaluated on every call; clients poll rather than subscribe.
#[derive(Debug, Serialize)]
pub struct ContestView {
    #[serde(flatten)]
    pub contest: Contest,
    pub phase: Phase,
    pub can_post: bool,
    pub show_winner: bool,
    pub show_countdown: bool,
}

impl ContestView {
    fn at(contest: Contest, now: chrono::DateTime<Utc>) -> Self {
        let phase = contest.phase_at(now);
        Self {
            can_post: contest.can_post_at(now),
            show_winner: contest.should_show_winner_at(now),
            show_countdown: contest.should_show_countdown_at(now),
            phase,
            contest,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReactionBody {
    pub emoji: String,
}

#[derive(Debug, Serialize)]
pub struct ReactionOutcome {
    pub outcome: ReactionToggle,
}

#[derive(Debug, Serialize)]
pub struct FlagOutcome {
    pub flagged: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: String,
}

async fn viewer(state: &AppState, headers: &HeaderMap) -> Result<Viewer> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    Ok(state.identity.resolve(token).await?)
}

pub async fn list_contests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContestView>>> {
    let now = Utc::now();
    let contests = state.contests.list_contests().await?;
    Ok(Json(
        contests
            .into_iter()
            .map(|contest| ContestView::at(contest, now))
            .collect(),
    ))
}

pub async fn get_contest(
    State(state): State<Arc<AppState>>,
    Path(contest_id): Path<Uuid>,
) -> Result<Json<ContestView>> {
    let contest = state
        .contests
        .get_contest(contest_id)
        .await?
        .ok_or_else(|| domains::AppError::NotFound("Contest".into(), contest_id.to_string()))?;
    Ok(Json(ContestView::at(contest, Utc::now())))
}

pub async fn contest_feed(
    State(state): State<Arc<AppState>>,
    Path(contest_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Vec<PostView>>> {
    let viewer = viewer(&state, &headers).await?;
    Ok(Json(state.posts.feed(contest_id, &viewer).await?))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Path(contest_id): Path<Uuid>,
    headers: HeaderMap,
    Json(draft): Json<PostDraft>,
) -> Result<(StatusCode, Json<ContestPost>)> {
    let viewer = viewer(&state, &headers).await?;
    let post = state
        .posts
        .log_entry(contest_id, &viewer, draft, Utc::now())
        .await?;
    state.metrics.entries_logged.inc();
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Path(contest_id): Path<Uuid>,
) -> Result<Json<Leaderboard>> {
    Ok(Json(state.leaderboard.standings(contest_id, Utc::now()).await?))
}

pub async fn toggle_reaction(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<ReactionBody>,
) -> Result<Json<ReactionOutcome>> {
    let viewer = viewer(&state, &headers).await?;
    let outcome = state
        .reactions
        .toggle_reaction(post_id, &viewer, &body.emoji)
        .await?;
    state.metrics.reactions_toggled.inc();
    Ok(Json(ReactionOutcome { outcome }))
}

pub async fn toggle_flag(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<FlagOutcome>> {
    let viewer = viewer(&state, &headers).await?;
    let flagged = state.reactions.toggle_flag(post_id, &viewer).await?;
    state.metrics.flags_toggled.inc();
    Ok(Json(FlagOutcome { flagged }))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<CommentThread>> {
    Ok(Json(state.comments.thread(post_id).await?))
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<CommentBody>,
) -> Result<(StatusCode, Json<Comment>)> {
    let viewer = viewer(&state, &headers).await?;
    let comment = state
        .comments
        .add(post_id, &viewer, &body.text, Utc::now())
        .await?;
    state.metrics.comments_added.inc();
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    let viewer = viewer(&state, &headers).await?;
    state.comments.delete(comment_id, &viewer).await?;
    state.metrics.comments_deleted.inc();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
