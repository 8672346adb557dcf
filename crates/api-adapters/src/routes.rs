//! Route table and middleware stack.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the application router. Mounted at the root so the binary can
/// nest it under a different prefix if it ever needs to.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/contests", get(handlers::list_contests))
        .route("/api/contests/{id}", get(handlers::get_contest))
        .route(
            "/api/contests/{id}/posts",
            get(handlers::contest_feed).post(handlers::create_post),
        )
        .route("/api/contests/{id}/leaderboard", get(handlers::leaderboard))
        .route("/api/posts/{id}/reactions", post(handlers::toggle_reaction))
        .route("/api/posts/{id}/flag", post(handlers::toggle_flag))
        .route(
            "/api/posts/{id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/api/comments/{id}", delete(handlers::delete_comment))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
