//! # Domain Models
//!
//! These structs represent the core entities of Tally-Board.
//! Records are owned by the external document store; everything held here
//! is a validated, read-mostly projection of it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::validate;

/// The emoji key that superseded the legacy `upvotes` field.
pub const THUMBS_UP: &str = "👍";

/// A time-boxed contest users log activity against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// What a post's `count` measures (e.g., "pushups", "laps")
    pub unit: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// End of the post-contest review window; contests without one skip
    /// the review phase entirely.
    pub end_of_review_date: Option<DateTime<Utc>>,
}

impl Contest {
    /// Builds a contest, rejecting out-of-order dates up front so the
    /// phase classifier never sees an undefined timeline.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        unit: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        end_of_review_date: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(AppError::ValidationError("contest title is empty".into()));
        }
        validate::contest_dates(start_date, end_date, end_of_review_date)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description,
            unit: unit.into(),
            start_date,
            end_date,
            end_of_review_date,
        })
    }
}

/// A single logged activity entry within a contest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestPost {
    pub id: Uuid,
    pub contest_id: Uuid,
    /// Owning user identity; opaque string issued by the identity provider.
    pub user_id: String,
    /// Display name snapshot taken at creation time.
    pub user_name: String,
    /// Quantity logged by this post, in the contest's unit.
    pub count: u32,
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// emoji symbol → set of user ids who reacted with that emoji.
    /// Invariant: a user id appears under at most one emoji key.
    #[serde(default)]
    pub reactions: BTreeMap<String, BTreeSet<String>>,
    /// User ids who flagged this post as suspicious; orthogonal to reactions.
    #[serde(default)]
    pub fishy_flags: BTreeSet<String>,
    /// Legacy single-upvote set, superseded by `reactions["👍"]`.
    /// Present only on posts that predate the reaction model; never
    /// written by new code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<BTreeSet<String>>,
}

impl ContestPost {
    /// Builds a new entry for `viewer` in `contest`. Phase gating is the
    /// posting service's job; this only validates the record itself.
    pub fn new(
        contest: &Contest,
        viewer: &Viewer,
        draft: PostDraft,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if viewer.anonymous {
            return Err(AppError::Unauthorized("sign in to log an entry".into()));
        }
        let description = match draft.description {
            Some(text) => Some(validate::post_description(&text)?),
            None => None,
        };
        Ok(Self {
            id: Uuid::new_v4(),
            contest_id: contest.id,
            user_id: viewer.user_id.clone(),
            user_name: viewer.user_name.clone(),
            count: draft.count,
            timestamp,
            description,
            image_url: draft.image_url,
            reactions: BTreeMap::new(),
            fishy_flags: BTreeSet::new(),
            upvotes: None,
        })
    }

    /// Whether this record still carries the legacy upvote set.
    pub fn has_legacy_upvotes(&self) -> bool {
        self.upvotes.as_ref().is_some_and(|set| !set.is_empty())
    }
}

/// Caller-supplied fields for a new [`ContestPost`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    pub count: u32,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A comment on a contest post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    /// Builds a comment, enforcing the 256-character contract and the
    /// authenticated-author rule.
    pub fn new(
        post_id: Uuid,
        viewer: &Viewer,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if viewer.anonymous {
            return Err(AppError::Unauthorized("sign in to comment".into()));
        }
        let text = validate::comment_text(text)?;
        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            user_id: viewer.user_id.clone(),
            user_name: viewer.user_name.clone(),
            text,
            timestamp,
        })
    }

    /// Comments are deletable by their author or an admin; otherwise immutable.
    pub fn can_delete(&self, viewer: &Viewer) -> bool {
        !viewer.anonymous && (viewer.admin || viewer.user_id == self.user_id)
    }
}

/// The resolved identity of the requesting user, as produced by the
/// identity adapter. Anonymous viewers read everything and write nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: String,
    pub user_name: String,
    pub anonymous: bool,
    pub admin: bool,
}

impl Viewer {
    pub fn signed_in(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            anonymous: false,
            admin: false,
        }
    }

    pub fn admin(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            admin: true,
            ..Self::signed_in(user_id, user_name)
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user_id: String::new(),
            user_name: "anonymous".into(),
            anonymous: true,
            admin: false,
        }
    }
}
