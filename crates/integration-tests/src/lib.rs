//! Shared fixtures for the cross-crate tests: a seeded in-memory store,
//! a static identity table, and builders for records in known states.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use api_adapters::AppState;
use auth_adapters::StaticIdentityProvider;
use domains::{Contest, ContestPost, IdentityProvider, Viewer};
use storage_adapters::MemoryStore;

pub const TOKEN_UNA: &str = "tok-una";
pub const TOKEN_DUO: &str = "tok-duo";
pub const TOKEN_ADMIN: &str = "tok-admin";

pub fn una() -> Viewer {
    Viewer::signed_in("u1", "Una")
}

pub fn duo() -> Viewer {
    Viewer::signed_in("u2", "Duo")
}

pub fn identity() -> Arc<dyn IdentityProvider> {
    Arc::new(
        StaticIdentityProvider::new()
            .with_viewer(TOKEN_UNA, una())
            .with_viewer(TOKEN_DUO, duo())
            .with_viewer(TOKEN_ADMIN, Viewer::admin("mod", "Mod")),
    )
}

/// A contest that is active at `now`, with a review window after it.
pub fn live_contest(now: DateTime<Utc>) -> Contest {
    Contest::new(
        "Pushup Hour",
        Some("Most pushups in the hour wins.".into()),
        "pushups",
        now - Duration::minutes(30),
        now + Duration::minutes(30),
        Some(now + Duration::days(1)),
    )
    .unwrap()
}

/// A bare post record in a known state; tests mutate fields directly.
pub fn post_in(contest: &Contest, user_id: &str, user_name: &str, count: u32, at: DateTime<Utc>) -> ContestPost {
    ContestPost {
        id: Uuid::new_v4(),
        contest_id: contest.id,
        user_id: user_id.into(),
        user_name: user_name.into(),
        count,
        timestamp: at,
        description: None,
        image_url: None,
        reactions: Default::default(),
        fishy_flags: Default::default(),
        upvotes: None,
    }
}

pub fn filler_text() -> String {
    Sentence(3..8).fake()
}

/// An [`AppState`] over a fresh [`MemoryStore`] and the static identity
/// table. The store handle is returned too so tests can seed directly.
pub fn app_state() -> (Arc<MemoryStore>, Arc<AppState>) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(
        store.clone(),
        store.clone(),
        store.clone(),
        identity(),
    ));
    (store, state)
}

#[cfg(feature = "web-axum")]
pub mod http {
    //! In-process request helpers for the API tests.

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    /// Sends one request through a fresh clone of the router and decodes
    /// the JSON body (Null for empty responses).
    pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, body)
    }

    pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        builder("GET", uri, token).body(Body::empty()).unwrap()
    }

    pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
        builder("DELETE", uri, token).body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
        builder("POST", uri, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
    }
}
