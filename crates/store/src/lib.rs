#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`store`]: The SQLite store (`ViolationStore`) and query row types
//! - [`schema`]: Embedded DDL applied on open
//! - [`error`]: Domain error types (`StoreError`)

pub mod error;
pub mod schema;
pub mod store;

// --- Public API re-exports ---

pub use error::StoreError;
pub use store::{RecentViolation, RunSummary, StoredViolation, ViolationStore};
