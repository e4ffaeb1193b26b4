//! Domain types shared across the workspace.
//!
//! A test run is described by a sequence of [`Event`]s read from a drive
//! log. The analysis crate turns events into [`Violation`]s, which the
//! store and CLI consume as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Elapsed time since the start of a scenario, in seconds.
///
/// Displayed and serialized in the canonical `MM:SS.s` log form
/// (zero-padded minutes, one decimal for seconds), e.g. `62.5` renders as
/// `"01:02.5"`. Comparisons operate on the raw seconds value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp(f64);

impl Timestamp {
    /// Create a timestamp from a seconds offset.
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Raw seconds offset.
    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Seconds elapsed since `earlier`.
    pub fn seconds_since(&self, earlier: Timestamp) -> f64 {
        self.0 - earlier.0
    }

    /// Parse a log timestamp of the form `M:SS` or `M:SS.s`.
    ///
    /// Minutes must be a non-negative integer; seconds must satisfy
    /// `0 <= s < 60`. Examples: `"0:05"` -> 5.0s, `"1:02.5"` -> 62.5s.
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::Timestamp {
            value: value.to_owned(),
            reason: reason.to_owned(),
        };

        let (minutes, seconds) = value
            .split_once(':')
            .ok_or_else(|| invalid("expected 'M:SS' or 'M:SS.s'"))?;

        let minutes: u32 = minutes
            .parse()
            .map_err(|_| invalid("minutes must be a non-negative integer"))?;
        let seconds: f64 = seconds
            .parse()
            .map_err(|_| invalid("seconds must be numeric"))?;

        if !(0.0..60.0).contains(&seconds) {
            return Err(invalid("seconds must be in [0, 60)"));
        }

        Ok(Self(f64::from(minutes) * 60.0 + seconds))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = (self.0 / 60.0).floor() as u64;
        let seconds = self.0 - (minutes as f64) * 60.0;
        write!(f, "{minutes:02}:{seconds:04.1}")
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Direction of a lane change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaneDirection {
    Left,
    Right,
}

impl LaneDirection {
    /// Parse the log argument (`LEFT` / `RIGHT`, exact match).
    pub fn from_log_arg(s: &str) -> Option<Self> {
        match s {
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for LaneDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "LEFT"),
            Self::Right => write!(f, "RIGHT"),
        }
    }
}

/// Typed payload of one telemetry event.
///
/// The set of kinds is closed: the log loader rejects unknown kind tokens
/// before events reach the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Speed reading in mph.
    Speed(f64),
    /// Distance to the vehicle ahead, in meters.
    FollowDistance(f64),
    /// Lane change in the given direction.
    LaneChange(LaneDirection),
    /// The vehicle detected a stop sign and came to a halt.
    StopSignDetected,
    /// The vehicle resumed motion after a detected stop sign.
    StopSignClear,
    /// Odometer reading in miles; establishes the position used for
    /// speed-zone lookups.
    Odometer(f64),
}

impl EventKind {
    /// The kind token as it appears in drive logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Speed(_) => "SPEED",
            Self::FollowDistance(_) => "FOLLOW_DISTANCE",
            Self::LaneChange(_) => "LANE_CHANGE",
            Self::StopSignDetected => "STOP_SIGN_DETECTED",
            Self::StopSignClear => "STOP_SIGN_CLEAR",
            Self::Odometer(_) => "ODOMETER",
        }
    }
}

/// One observed telemetry point from a drive log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Elapsed time since scenario start.
    pub timestamp: Timestamp,
    /// Typed payload.
    pub kind: EventKind,
}

impl Event {
    pub fn new(timestamp: Timestamp, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.timestamp, self.kind.label())
    }
}

/// Global rule thresholds for one scenario.
///
/// All three values are required and must be positive; the scenario
/// loader enforces this before the rules reach the detector or the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadRules {
    /// Maximum speed in mph outside any speed zone.
    pub max_speed: f64,
    /// Minimum following distance in meters.
    pub min_follow_distance: f64,
    /// Required wait at a stop sign, in seconds.
    pub stop_sign_wait: f64,
}

/// A per-mile override of the global speed limit.
///
/// Zones are half-open ranges `[start_mile, end_mile)`: a zone may begin
/// exactly where the previous one ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedZone {
    /// Inclusive start of the zone, in miles.
    pub start_mile: f64,
    /// Exclusive end of the zone, in miles.
    pub end_mile: f64,
    /// Speed limit within the zone, in mph.
    pub speed_limit: f64,
}

impl SpeedZone {
    /// Whether `mile` falls inside this zone.
    pub fn contains(&self, mile: f64) -> bool {
        self.start_mile <= mile && mile < self.end_mile
    }
}

/// Category of a detected rule breach.
///
/// Stored as text in the violation table and rendered verbatim in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    Speeding,
    Tailgating,
    RollingStop,
    UnsafeLaneChange,
}

impl ViolationKind {
    /// The persisted / reported form of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speeding => "SPEEDING",
            Self::Tailgating => "TAILGATING",
            Self::RollingStop => "ROLLING_STOP",
            Self::UnsafeLaneChange => "UNSAFE_LANE_CHANGE",
        }
    }

    /// Parse a kind from user input, case-insensitively.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SPEEDING" => Some(Self::Speeding),
            "TAILGATING" => Some(Self::Tailgating),
            "ROLLING_STOP" => Some(Self::RollingStop),
            "UNSAFE_LANE_CHANGE" => Some(Self::UnsafeLaneChange),
            _ => None,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected breach of a road rule.
///
/// Immutable once created; the detector hands the full list to the caller
/// and retains nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation category.
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    /// Timestamp of the triggering event.
    #[serde(rename = "time")]
    pub timestamp: Timestamp,
    /// Human-readable measurement vs. threshold, e.g.
    /// `"40.0 mph in 35 mph zone"`.
    pub details: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, timestamp: Timestamp, details: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp,
            details: details.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp, self.kind, self.details)
    }
}
