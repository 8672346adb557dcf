//! # Contest Phase Classifier
//!
//! A contest's lifecycle phase is a pure function of its three date fields
//! and the supplied instant. Nothing is cached: callers re-evaluate per
//! request (or per render tick) to observe live transitions.
//!
//! All intervals are half-open and left-inclusive, so a boundary instant
//! always belongs to the *later* phase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Contest;

/// The lifecycle stage of a contest at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Before `start_date`: visible, not yet open for entries.
    Upcoming,
    /// `[start_date, end_date)`: entries may be logged.
    Active,
    /// `[end_date, end_of_review_date)`: results under review; only reached
    /// when the contest defines a review window.
    Review,
    /// Past the timeline: final.
    Completed,
}

impl Contest {
    /// Classifies this contest at `now`.
    pub fn phase_at(&self, now: DateTime<Utc>) -> Phase {
        if now < self.start_date {
            return Phase::Upcoming;
        }
        if now < self.end_date {
            return Phase::Active;
        }
        match self.end_of_review_date {
            Some(end_of_review) if now < end_of_review => Phase::Review,
            _ => Phase::Completed,
        }
    }

    /// Entries may only be logged while the contest is active.
    pub fn can_post_at(&self, now: DateTime<Utc>) -> bool {
        self.phase_at(now) == Phase::Active
    }

    /// The winner is surfaced once the posting window has closed.
    pub fn should_show_winner_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.phase_at(now), Phase::Review | Phase::Completed)
    }

    /// A countdown (to start, then to end) renders until the posting
    /// window closes.
    pub fn should_show_countdown_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.phase_at(now), Phase::Upcoming | Phase::Active)
    }
}
