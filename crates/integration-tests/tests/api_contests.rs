//! Contest and leaderboard endpoints end to end.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use api_adapters::routes;
use domains::{Contest, ContestRepo, PostRepo};
use integration_tests::{app_state, http, live_contest, post_in, TOKEN_UNA};

#[tokio::test]
async fn contest_listing_carries_phase_and_gating() {
    let now = Utc::now();
    let (store, state) = app_state();
    store.create_contest(live_contest(now)).await.unwrap();
    let router = routes::router(state);

    let (status, body) = http::send(&router, http::get("/api/contests", None)).await;
    assert_eq!(status, StatusCode::OK);
    let contest = &body.as_array().unwrap()[0];
    assert_eq!(contest["phase"], json!("active"));
    assert_eq!(contest["can_post"], json!(true));
    assert_eq!(contest["show_countdown"], json!(true));
    assert_eq!(contest["show_winner"], json!(false));
}

#[tokio::test]
async fn unknown_contest_maps_to_404() {
    let (_store, state) = app_state();
    let router = routes::router(state);
    let uri = format!("/api/contests/{}", Uuid::new_v4());
    let (status, body) = http::send(&router, http::get(&uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn posting_through_the_api_respects_the_window() {
    let now = Utc::now();
    let (store, state) = app_state();
    let active = live_contest(now);
    let mut finished = live_contest(now);
    finished.id = Uuid::new_v4();
    finished.start_date = now - Duration::days(2);
    finished.end_date = now - Duration::days(1);
    finished.end_of_review_date = None;
    store.create_contest(active.clone()).await.unwrap();
    store.create_contest(finished.clone()).await.unwrap();
    let router = routes::router(state);

    let draft = json!({ "count": 12 });
    let uri = format!("/api/contests/{}/posts", active.id);
    let (status, body) = http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &draft)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["count"], json!(12));

    let uri = format!("/api/contests/{}/posts", finished.id);
    let (status, _) = http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn leaderboard_hides_the_winner_until_review() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();
    store
        .create_post(post_in(&contest, "u1", "Una", 40, now - Duration::minutes(10)))
        .await
        .unwrap();
    store
        .create_post(post_in(&contest, "u2", "Duo", 25, now - Duration::minutes(5)))
        .await
        .unwrap();
    let router = routes::router(state);

    let uri = format!("/api/contests/{}/leaderboard", contest.id);
    let (status, body) = http::send(&router, http::get(&uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["standings"][0]["user_id"], json!("u1"));
    assert_eq!(body["standings"][0]["total"], json!(40));
    assert_eq!(body["winner"], json!(null));
}

#[tokio::test]
async fn completed_contest_reports_its_winner() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = Contest::new(
        "Done Deal",
        None,
        "reps",
        now - Duration::days(3),
        now - Duration::days(2),
        None,
    )
    .unwrap();
    store.create_contest(contest.clone()).await.unwrap();
    store
        .create_post(post_in(&contest, "u2", "Duo", 80, now - Duration::days(2)))
        .await
        .unwrap();
    let router = routes::router(state);

    let uri = format!("/api/contests/{}/leaderboard", contest.id);
    let (_, body) = http::send(&router, http::get(&uri, None)).await;
    assert_eq!(body["winner"]["user_id"], json!("u2"));
}
