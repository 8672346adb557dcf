//! # storage-adapters
//!
//! Implementations of the repository ports. Raw store documents are parsed
//! into the strict domain model at this boundary; nothing loosely-typed
//! crosses into the services.

pub mod docs;
pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;
