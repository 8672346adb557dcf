//! Reaction and flag endpoints: toggles, the self-action gate, anonymity.

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use api_adapters::routes;
use domains::{ContestRepo, PostRepo};
use integration_tests::{app_state, http, live_contest, post_in, TOKEN_DUO, TOKEN_UNA};

#[tokio::test]
async fn reaction_round_trip_through_the_api() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();
    let post = post_in(&contest, "author", "Sam", 10, now);
    store.create_post(post.clone()).await.unwrap();
    let router = routes::router(state);

    let uri = format!("/api/posts/{}/reactions", post.id);
    let fire = json!({ "emoji": "🔥" });

    let (status, body) = http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &fire)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], json!("added"));

    let flex = json!({ "emoji": "💪" });
    let (_, body) = http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &flex)).await;
    assert_eq!(body["outcome"]["switched"]["previous"], json!("🔥"));

    let (_, body) = http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &flex)).await;
    assert_eq!(body["outcome"], json!("removed"));

    let stored = store.get_post(post.id).await.unwrap().unwrap();
    assert!(stored.reactions.is_empty());
}

#[tokio::test]
async fn self_reaction_and_anonymous_reaction_are_forbidden() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();
    // authored by u1, who is TOKEN_UNA
    let post = post_in(&contest, "u1", "Una", 10, now);
    store.create_post(post.clone()).await.unwrap();
    let router = routes::router(state);

    let uri = format!("/api/posts/{}/reactions", post.id);
    let body = json!({ "emoji": "🔥" });

    let (status, _) = http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = http::send(&router, http::post_json(&uri, None, &body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let stored = store.get_post(post.id).await.unwrap().unwrap();
    assert!(stored.reactions.is_empty());
}

#[tokio::test]
async fn flag_toggles_on_and_off() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();
    let post = post_in(&contest, "u1", "Una", 900, now);
    store.create_post(post.clone()).await.unwrap();
    let router = routes::router(state);

    let uri = format!("/api/posts/{}/flag", post.id);
    let (status, body) = http::send(&router, http::post_json(&uri, Some(TOKEN_DUO), &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flagged"], json!(true));

    let stored = store.get_post(post.id).await.unwrap().unwrap();
    assert!(stored.fishy_flags.contains("u2"));

    let (_, body) = http::send(&router, http::post_json(&uri, Some(TOKEN_DUO), &json!({}))).await;
    assert_eq!(body["flagged"], json!(false));
}

#[tokio::test]
async fn reacting_to_a_missing_post_is_404() {
    let (_store, state) = app_state();
    let router = routes::router(state);
    let uri = format!("/api/posts/{}/reactions", Uuid::new_v4());
    let (status, _) =
        http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &json!({ "emoji": "🔥" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
