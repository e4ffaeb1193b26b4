#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`scenario`]: Scenario JSON loading and validation (`Scenario`, `RoadRules`, `SpeedZone`)
//! - [`log`]: Drive log parsing (`EventLogParser`)
//! - [`detector`]: The violation rule engine (`ViolationDetector`)
//! - [`error`]: Domain error types (`AnalysisError`)
//!
//! # Data Flow
//!
//! ```text
//! scenario.json --> Scenario ----\
//!                                 +--> ViolationDetector::detect --> Vec<Violation>
//! drive.log --> EventLogParser --/
//! ```

pub mod detector;
pub mod error;
pub mod log;
pub mod scenario;

/// Tolerance for floating-point comparisons against rule thresholds.
///
/// Keeps sensor jitter at the 1e-9 scale from flipping strict
/// inequalities; a reading exactly at a threshold is never a violation.
pub(crate) const EPSILON: f64 = 1e-9;

// --- Public API re-exports ---

// Detection
pub use detector::ViolationDetector;

// Scenario configuration
pub use scenario::{RoadRules, Scenario, SpeedZone};

// Log parsing
pub use log::EventLogParser;

// Errors
pub use error::AnalysisError;
