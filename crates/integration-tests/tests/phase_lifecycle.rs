//! Contest lifecycle walked end to end against fixed instants.

use chrono::{TimeZone, Utc};

use domains::{Contest, Phase};

fn instant(d: u32, h: u32, mi: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, d, h, mi, 0).unwrap()
}

fn contest_with_review() -> Contest {
    Contest::new(
        "Pushup Hour",
        None,
        "pushups",
        instant(4, 12, 0),
        instant(4, 13, 0),
        Some(instant(5, 13, 0)),
    )
    .unwrap()
}

#[test]
fn lifecycle_matches_the_published_timeline() {
    let contest = contest_with_review();

    let before = instant(4, 11, 59);
    assert_eq!(contest.phase_at(before), Phase::Upcoming);
    assert!(contest.should_show_countdown_at(before));
    assert!(!contest.can_post_at(before));

    let during = instant(4, 12, 30);
    assert_eq!(contest.phase_at(during), Phase::Active);
    assert!(contest.can_post_at(during));
    assert!(contest.should_show_countdown_at(during));
    assert!(!contest.should_show_winner_at(during));

    let review = instant(4, 18, 0);
    assert_eq!(contest.phase_at(review), Phase::Review);
    assert!(contest.should_show_winner_at(review));
    assert!(!contest.can_post_at(review));

    let after = instant(6, 0, 0);
    assert_eq!(contest.phase_at(after), Phase::Completed);
    assert!(contest.should_show_winner_at(after));
    assert!(!contest.should_show_countdown_at(after));
}

#[test]
fn start_instant_opens_the_posting_window() {
    let contest = contest_with_review();
    assert_eq!(contest.phase_at(instant(4, 12, 0)), Phase::Active);
}

#[test]
fn end_instant_enters_review_when_a_window_exists() {
    let contest = contest_with_review();
    assert_eq!(contest.phase_at(instant(4, 13, 0)), Phase::Review);

    let mut without_review = contest_with_review();
    without_review.end_of_review_date = None;
    assert_eq!(without_review.phase_at(instant(4, 13, 0)), Phase::Completed);
}

#[test]
fn invalid_timelines_never_reach_the_classifier() {
    assert!(Contest::new(
        "Backwards",
        None,
        "reps",
        instant(4, 13, 0),
        instant(4, 12, 0),
        None,
    )
    .is_err());

    assert!(Contest::new(
        "Short review",
        None,
        "reps",
        instant(4, 12, 0),
        instant(4, 13, 0),
        Some(instant(4, 12, 30)),
    )
    .is_err());
}
