//! # domains
//!
//! The central domain logic and interface definitions for Tally-Board:
//! contest lifecycle, reaction reconciliation, and the port traits the
//! adapter crates implement.

pub mod error;
pub mod models;
pub mod phase;
pub mod ports;
pub mod reactions;
pub mod validate;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use phase::Phase;
pub use ports::*;
