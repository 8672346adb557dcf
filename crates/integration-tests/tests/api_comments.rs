//! Comment endpoints: creation rules, collapse hint, delete permissions.

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use api_adapters::routes;
use domains::{ContestRepo, PostRepo};
use integration_tests::{app_state, http, live_contest, post_in, TOKEN_ADMIN, TOKEN_DUO, TOKEN_UNA};

#[tokio::test]
async fn comment_create_and_delete_permissions() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();
    let post = post_in(&contest, "author", "Sam", 10, now);
    store.create_post(post.clone()).await.unwrap();
    let router = routes::router(state);

    let uri = format!("/api/posts/{}/comments", post.id);
    let (status, body) =
        http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &json!({ "text": "  nice pace  " }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["text"], json!("nice pace"));
    let comment_id = body["id"].as_str().unwrap().to_string();

    // stranger: forbidden; author: gone
    let delete_uri = format!("/api/comments/{comment_id}");
    let (status, _) = http::send(&router, http::delete(&delete_uri, Some(TOKEN_DUO))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = http::send(&router, http::delete(&delete_uri, Some(TOKEN_UNA))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, thread) = http::send(&router, http::get(&uri, None)).await;
    assert_eq!(thread["comments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn admin_deletes_someone_elses_comment() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();
    let post = post_in(&contest, "author", "Sam", 10, now);
    store.create_post(post.clone()).await.unwrap();
    let router = routes::router(state);

    let uri = format!("/api/posts/{}/comments", post.id);
    let (_, body) =
        http::send(&router, http::post_json(&uri, Some(TOKEN_DUO), &json!({ "text": "sus" }))).await;
    let delete_uri = format!("/api/comments/{}", body["id"].as_str().unwrap());
    let (status, _) = http::send(&router, http::delete(&delete_uri, Some(TOKEN_ADMIN))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn invalid_comments_are_rejected_with_400() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();
    let post = post_in(&contest, "author", "Sam", 10, now);
    store.create_post(post.clone()).await.unwrap();
    let router = routes::router(state);

    let uri = format!("/api/posts/{}/comments", post.id);
    for text in [json!(""), json!("   "), json!("x".repeat(300))] {
        let (status, _) =
            http::send(&router, http::post_json(&uri, Some(TOKEN_UNA), &json!({ "text": text }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // anonymous viewers cannot comment at all
    let (status, _) =
        http::send(&router, http::post_json(&uri, None, &json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn thread_reports_when_it_is_collapsible() {
    let now = Utc::now();
    let (store, state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();
    let post = post_in(&contest, "author", "Sam", 10, now);
    store.create_post(post.clone()).await.unwrap();
    let router = routes::router(state);

    let uri = format!("/api/posts/{}/comments", post.id);
    for i in 0..4 {
        let (status, _) = http::send(
            &router,
            http::post_json(&uri, Some(TOKEN_UNA), &json!({ "text": format!("comment {i}") })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, thread) = http::send(&router, http::get(&uri, None)).await;
    assert_eq!(thread["collapsible"], json!(true));
    assert_eq!(thread["comments"].as_array().unwrap().len(), 4);
}
