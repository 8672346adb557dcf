//! Shared validation helpers applied at record construction and at the
//! document-store boundary.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};

/// Hard limit on comment length, in characters (not bytes).
pub const MAX_COMMENT_CHARS: usize = 256;

/// Soft cap on post descriptions; matches the entry form.
pub const MAX_DESCRIPTION_CHARS: usize = 1024;

/// A contest timeline must satisfy `start ≤ end ≤ end_of_review`.
pub fn contest_dates(
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    end_of_review_date: Option<DateTime<Utc>>,
) -> Result<()> {
    if end_date < start_date {
        return Err(AppError::ValidationError(format!(
            "end date {end_date} precedes start date {start_date}"
        )));
    }
    if let Some(end_of_review) = end_of_review_date {
        if end_of_review < end_date {
            return Err(AppError::ValidationError(format!(
                "end of review {end_of_review} precedes end date {end_date}"
            )));
        }
    }
    Ok(())
}

/// Trims comment text and enforces the non-empty / 256-character contract.
/// Returns the trimmed text to store.
pub fn comment_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError("comment is empty".into()));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_COMMENT_CHARS {
        return Err(AppError::ValidationError(format!(
            "comment is {chars} characters, limit is {MAX_COMMENT_CHARS}"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims a post description; empty after trimming collapses to an error so
/// callers pass `None` instead of storing blank strings.
pub fn post_description(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError("description is empty".into()));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(AppError::ValidationError(format!(
            "description is {chars} characters, limit is {MAX_DESCRIPTION_CHARS}"
        )));
    }
    Ok(trimmed.to_string())
}
