//! # AppError
//!
//! Centralized error handling for the Tally-Board ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Contest, Post, Comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., comment too long, dates out of order)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Security failure (e.g., anonymous write, self-reaction, non-author delete)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., duplicate post id)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., document store unreachable)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for Tally-Board logic.
pub type Result<T> = std::result::Result<T, AppError>;
