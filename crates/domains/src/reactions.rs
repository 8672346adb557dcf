//! # Reaction Reconciler
//!
//! Normalizes a post's reaction state into a read-only view (including the
//! legacy-upvote shim) and computes the result of toggle intents. Nothing
//! here persists anything: the services apply the mutated record back
//! through the repository ports.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{ContestPost, Viewer, THUMBS_UP};

/// Read-only view of a post's reactions with the legacy upvote set folded
/// in. Built fresh from the record on every read; never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedReactions {
    reactions: BTreeMap<String, BTreeSet<String>>,
    flags: BTreeSet<String>,
}

impl NormalizedReactions {
    /// emoji → reacting user ids.
    pub fn reactions(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.reactions
    }

    /// The single emoji this user reacted with, if any.
    pub fn find_user_reaction(&self, user_id: &str) -> Option<&str> {
        self.reactions
            .iter()
            .find(|(_, users)| users.contains(user_id))
            .map(|(emoji, _)| emoji.as_str())
    }

    /// Whether this user flagged the post as suspicious.
    pub fn has_flagged(&self, user_id: &str) -> bool {
        self.flags.contains(user_id)
    }

    pub fn count(&self, emoji: &str) -> usize {
        self.reactions.get(emoji).map_or(0, BTreeSet::len)
    }

    pub fn flag_count(&self) -> usize {
        self.flags.len()
    }
}

/// Builds the normalized view of `post`.
///
/// Legacy shim: a non-empty `upvotes` set is surfaced as the `"👍"` entry
/// unless that key already exists (the reaction model wins on conflict).
/// The source record is not touched; persisting the merge is the batch
/// migration's job.
pub fn normalize(post: &ContestPost) -> NormalizedReactions {
    let mut reactions = post.reactions.clone();
    if let Some(upvotes) = &post.upvotes {
        if !upvotes.is_empty() && !reactions.contains_key(THUMBS_UP) {
            reactions.insert(THUMBS_UP.to_string(), upvotes.clone());
        }
    }
    NormalizedReactions {
        reactions,
        flags: post.fishy_flags.clone(),
    }
}

/// What a [`toggle_reaction`] call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionToggle {
    /// Viewer had no reaction; now has `emoji`.
    Added,
    /// Viewer had `emoji`; now has none.
    Removed,
    /// Viewer switched from `previous` to `emoji` in one step.
    Switched { previous: String },
}

/// Folds a legacy `upvotes` set into `reactions["👍"]` and clears it.
/// Idempotent; returns whether the record changed. The reaction model wins
/// when the `"👍"` key already exists.
pub fn merge_legacy_upvotes(post: &mut ContestPost) -> bool {
    match post.upvotes.take() {
        Some(upvotes) => {
            if !upvotes.is_empty() && !post.reactions.contains_key(THUMBS_UP) {
                post.reactions.insert(THUMBS_UP.to_string(), upvotes);
            }
            true
        }
        None => false,
    }
}

/// Toggles `viewer`'s reaction on `post` to `emoji`.
///
/// Reactions are mutually exclusive per viewer: selecting a different emoji
/// moves the viewer in one step, never leaving them in two sets at once.
/// The record is validated before anything is touched, so a rejected call
/// leaves `post` unchanged.
pub fn toggle_reaction(
    post: &mut ContestPost,
    viewer: &Viewer,
    emoji: &str,
) -> Result<ReactionToggle> {
    ensure_can_mark(post, viewer, "react to")?;
    if emoji.trim().is_empty() {
        return Err(AppError::ValidationError("reaction emoji is empty".into()));
    }

    // The record is being rewritten, so the legacy set is folded in first;
    // otherwise a legacy upvoter could surface under two emoji at once.
    merge_legacy_upvotes(post);

    let previous = normalize(post)
        .find_user_reaction(&viewer.user_id)
        .map(str::to_string);

    match previous {
        Some(prev) if prev == emoji => {
            remove_user(post, &prev, &viewer.user_id);
            Ok(ReactionToggle::Removed)
        }
        Some(prev) => {
            remove_user(post, &prev, &viewer.user_id);
            post.reactions
                .entry(emoji.to_string())
                .or_default()
                .insert(viewer.user_id.clone());
            Ok(ReactionToggle::Switched { previous: prev })
        }
        None => {
            post.reactions
                .entry(emoji.to_string())
                .or_default()
                .insert(viewer.user_id.clone());
            Ok(ReactionToggle::Added)
        }
    }
}

/// Toggles `viewer`'s fishy flag on `post`. Returns whether the post is
/// flagged by the viewer afterwards.
pub fn toggle_flag(post: &mut ContestPost, viewer: &Viewer) -> Result<bool> {
    ensure_can_mark(post, viewer, "flag")?;
    if post.fishy_flags.remove(&viewer.user_id) {
        Ok(false)
    } else {
        post.fishy_flags.insert(viewer.user_id.clone());
        Ok(true)
    }
}

/// Reactions and flags are forbidden for anonymous viewers and for the
/// post's own author. Hard invariant, not a UI convenience: the call fails
/// loudly and the record is untouched.
fn ensure_can_mark(post: &ContestPost, viewer: &Viewer, verb: &str) -> Result<()> {
    if viewer.anonymous {
        return Err(AppError::Unauthorized(format!("sign in to {verb} posts")));
    }
    if viewer.user_id == post.user_id {
        return Err(AppError::Unauthorized(format!(
            "cannot {verb} your own post"
        )));
    }
    Ok(())
}

fn remove_user(post: &mut ContestPost, emoji: &str, user_id: &str) {
    if let Some(users) = post.reactions.get_mut(emoji) {
        users.remove(user_id);
        if users.is_empty() {
            post.reactions.remove(emoji);
        }
    }
}
