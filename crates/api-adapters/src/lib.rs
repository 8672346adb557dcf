//! # api-adapters
//!
//! The HTTP surface the web client consumes. Handlers resolve the viewer,
//! delegate to the services, and map domain errors to status codes; nothing
//! here re-implements domain rules.

pub mod metrics;
pub mod state;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod routes;

pub use state::AppState;
