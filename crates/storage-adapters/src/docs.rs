//! Document decoding at the store boundary.
//!
//! The external document store has no schema: records written by old client
//! versions carry legacy fields, missing optionals, or junk. Everything is
//! parsed and validated here, immediately on read. A record that fails is
//! quarantined with its reason and excluded from results; malformed data
//! never reaches the domain as loosely-typed values.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use domains::{validate, AppError, Comment, Contest, ContestPost, Result};

/// A document that failed decoding, with the reason it was set aside.
#[derive(Debug, Clone)]
pub struct Quarantined {
    /// The document's `id` field when one was readable.
    pub doc_id: Option<String>,
    pub reason: String,
}

#[derive(Deserialize)]
struct RawContest {
    id: Uuid,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    #[serde(default)]
    end_of_review_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawPost {
    id: Uuid,
    contest_id: Uuid,
    user_id: String,
    #[serde(default)]
    user_name: Option<String>,
    count: i64,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    reactions: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    fishy_flags: BTreeSet<String>,
    #[serde(default)]
    upvotes: Option<BTreeSet<String>>,
}

#[derive(Deserialize)]
struct RawComment {
    id: Uuid,
    post_id: Uuid,
    user_id: String,
    user_name: String,
    text: String,
    timestamp: DateTime<Utc>,
}

pub fn decode_contest(doc: &Value) -> Result<Contest> {
    let raw: RawContest = parse(doc, "contest")?;
    validate::contest_dates(raw.start_date, raw.end_date, raw.end_of_review_date)?;
    if raw.title.trim().is_empty() {
        return Err(AppError::ValidationError("contest title is empty".into()));
    }
    Ok(Contest {
        id: raw.id,
        title: raw.title,
        description: raw.description,
        unit: raw.unit.unwrap_or_else(|| "count".into()),
        start_date: raw.start_date,
        end_date: raw.end_date,
        end_of_review_date: raw.end_of_review_date,
    })
}

pub fn decode_post(doc: &Value) -> Result<ContestPost> {
    let raw: RawPost = parse(doc, "post")?;
    let count = u32::try_from(raw.count)
        .map_err(|_| AppError::ValidationError(format!("post count {} out of range", raw.count)))?;
    if raw.user_id.is_empty() {
        return Err(AppError::ValidationError("post has no owner".into()));
    }
    Ok(ContestPost {
        id: raw.id,
        contest_id: raw.contest_id,
        user_id: raw.user_id,
        user_name: raw.user_name.unwrap_or_else(|| "anonymous".into()),
        count,
        timestamp: raw.timestamp,
        description: raw.description,
        image_url: raw.image_url,
        reactions: raw.reactions,
        fishy_flags: raw.fishy_flags,
        upvotes: raw.upvotes,
    })
}

pub fn decode_comment(doc: &Value) -> Result<Comment> {
    let raw: RawComment = parse(doc, "comment")?;
    let text = validate::comment_text(&raw.text)?;
    Ok(Comment {
        id: raw.id,
        post_id: raw.post_id,
        user_id: raw.user_id,
        user_name: raw.user_name,
        text,
        timestamp: raw.timestamp,
    })
}

/// Decodes a batch, partitioning into valid records and quarantined
/// documents. The batch never fails as a whole; each quarantine is logged.
pub fn decode_batch<T>(docs: &[Value], decode: impl Fn(&Value) -> Result<T>) -> (Vec<T>, Vec<Quarantined>) {
    let mut valid = Vec::with_capacity(docs.len());
    let mut quarantined = Vec::new();
    for doc in docs {
        match decode(doc) {
            Ok(record) => valid.push(record),
            Err(err) => {
                let doc_id = doc
                    .get("id")
                    .map(|id| id.to_string().trim_matches('"').to_string());
                warn!(doc_id = doc_id.as_deref().unwrap_or("<unknown>"), %err, "quarantined malformed document");
                quarantined.push(Quarantined { doc_id, reason: err.to_string() });
            }
        }
    }
    (valid, quarantined)
}

fn parse<'de, T: Deserialize<'de>>(doc: &'de Value, kind: &str) -> Result<T> {
    T::deserialize(doc).map_err(|err| {
        AppError::ValidationError(format!("malformed {kind} document: {err}"))
    })
}
