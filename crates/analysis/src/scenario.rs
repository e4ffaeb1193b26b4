//! Scenario configuration -- road rules and speed zones.
//!
//! A scenario JSON file pairs a name with the rule thresholds and optional
//! per-mile speed zones for one test run:
//!
//! ```json
//! {
//!   "name": "Suburban loop",
//!   "road_rules": {
//!     "max_speed": 35.0,
//!     "min_follow_distance": 2.0,
//!     "stop_sign_wait": 3.0
//!   },
//!   "speed_zones": [
//!     { "start_mile": 0.0, "end_mile": 1.5, "speed_limit": 30.0 }
//!   ]
//! }
//! ```
//!
//! [`Scenario::load`] parses and validates; downstream code (the detector
//! in particular) trusts a loaded scenario completely and never
//! re-validates.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::EPSILON;
use crate::error::AnalysisError;

pub use roadcheck_core::types::{RoadRules, SpeedZone};

/// One test run's configuration: ruleset plus speed zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: String,
    /// Global rule thresholds.
    pub road_rules: RoadRules,
    /// Speed zones, kept sorted by `start_mile` after loading.
    #[serde(default)]
    pub speed_zones: Vec<SpeedZone>,
}

impl Scenario {
    /// Load a scenario from a JSON file and validate it.
    ///
    /// Zones are sorted by `start_mile` as part of loading, so callers can
    /// rely on their order.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AnalysisError::Scenario {
                    path: path.display().to_string(),
                    reason: "file not found".to_owned(),
                }
            } else {
                AnalysisError::Io(e)
            }
        })?;
        let scenario = Self::parse(&content, &path.display().to_string())?;
        debug!(
            scenario = %scenario.name,
            zones = scenario.speed_zones.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    /// Parse and validate a scenario from a JSON string.
    ///
    /// `origin` names the input in error messages (a path, or `"<memory>"`).
    pub fn parse(json: &str, origin: &str) -> Result<Self, AnalysisError> {
        let mut scenario: Self =
            serde_json::from_str(json).map_err(|e| AnalysisError::Scenario {
                path: origin.to_owned(),
                reason: e.to_string(),
            })?;
        scenario
            .speed_zones
            .sort_by(|a, b| a.start_mile.total_cmp(&b.start_mile));
        scenario.validate(origin)?;
        Ok(scenario)
    }

    /// Validate thresholds and zone geometry.
    ///
    /// Requires positive thresholds, `start_mile < end_mile` with a
    /// non-negative start, positive zone limits, and no overlap between
    /// zones (assumes zones sorted by `start_mile`).
    pub fn validate(&self, origin: &str) -> Result<(), AnalysisError> {
        let invalid = |reason: String| AnalysisError::Scenario {
            path: origin.to_owned(),
            reason,
        };

        for (field, value) in [
            ("road_rules.max_speed", self.road_rules.max_speed),
            (
                "road_rules.min_follow_distance",
                self.road_rules.min_follow_distance,
            ),
            ("road_rules.stop_sign_wait", self.road_rules.stop_sign_wait),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{field} must be a positive number, got {value}")));
            }
        }

        for (idx, zone) in self.speed_zones.iter().enumerate() {
            if !zone.start_mile.is_finite() || zone.start_mile < 0.0 {
                return Err(invalid(format!(
                    "speed_zones[{idx}].start_mile must be non-negative, got {}",
                    zone.start_mile
                )));
            }
            if !zone.end_mile.is_finite() || zone.end_mile <= zone.start_mile {
                return Err(invalid(format!(
                    "speed_zones[{idx}] must have start_mile < end_mile ({} >= {})",
                    zone.start_mile, zone.end_mile
                )));
            }
            if !zone.speed_limit.is_finite() || zone.speed_limit <= 0.0 {
                return Err(invalid(format!(
                    "speed_zones[{idx}].speed_limit must be a positive number, got {}",
                    zone.speed_limit
                )));
            }
        }

        for pair in self.speed_zones.windows(2) {
            // Half-open ranges: touching boundaries are fine.
            if pair[1].start_mile < pair[0].end_mile - EPSILON {
                return Err(invalid(format!(
                    "speed zones overlap: [{}, {}) and [{}, {})",
                    pair[0].start_mile, pair[0].end_mile, pair[1].start_mile, pair[1].end_mile
                )));
            }
        }

        Ok(())
    }
}
