#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod types;

// --- Public API re-exports ---

// Errors
pub use error::{ConfigError, DetectError, ParseError, RoadcheckError, StorageError};

// Configuration
pub use config::{GeneralConfig, RoadcheckConfig, StorageConfig};

// Domain types
pub use types::{
    Event, EventKind, LaneDirection, RoadRules, SpeedZone, Timestamp, Violation, ViolationKind,
};
