//! The batch migration against a populated store: merge, clear, idempotence.

use chrono::{Duration, Utc};
use integration_tests::{app_state, live_contest, post_in};
use services::MigrationService;

use domains::{ContestRepo, PostRepo, THUMBS_UP};

#[tokio::test]
async fn migrates_every_legacy_post_and_settles() {
    let now = Utc::now();
    let (store, _state) = app_state();
    let contest = live_contest(now);
    store.create_contest(contest.clone()).await.unwrap();

    let mut plain = post_in(&contest, "a1", "Ada", 10, now - Duration::minutes(30));
    plain.reactions.insert("🔥".into(), ["u5".to_string()].into());

    let mut legacy = post_in(&contest, "a2", "Bo", 20, now - Duration::minutes(20));
    legacy.upvotes = Some(["u1".to_string(), "u2".to_string()].into());

    // conflict case: both models present; the reaction key must win
    let mut conflicted = post_in(&contest, "a3", "Cy", 30, now - Duration::minutes(10));
    conflicted.upvotes = Some(["u3".to_string()].into());
    conflicted
        .reactions
        .insert(THUMBS_UP.into(), ["u4".to_string()].into());

    for post in [&plain, &legacy, &conflicted] {
        store.create_post(post.clone()).await.unwrap();
    }

    let migration = MigrationService::new(store.clone());
    let report = migration.migrate_legacy_upvotes().await.unwrap();
    assert_eq!(report.scanned, 2);
    assert_eq!(report.migrated, 2);
    assert_eq!(report.failed, 0);

    let migrated = store.get_post(legacy.id).await.unwrap().unwrap();
    assert!(migrated.upvotes.is_none());
    assert_eq!(migrated.reactions[THUMBS_UP].len(), 2);

    let kept = store.get_post(conflicted.id).await.unwrap().unwrap();
    assert!(kept.upvotes.is_none());
    assert!(kept.reactions[THUMBS_UP].contains("u4"));
    assert!(!kept.reactions[THUMBS_UP].contains("u3"));

    let untouched = store.get_post(plain.id).await.unwrap().unwrap();
    assert_eq!(untouched.reactions, plain.reactions);

    // second pass: nothing left to do
    let rerun = migration.migrate_legacy_upvotes().await.unwrap();
    assert_eq!(rerun.scanned, 0);
    assert_eq!(rerun.migrated, 0);
}
