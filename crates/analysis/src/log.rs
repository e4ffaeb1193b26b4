//! Drive log parser.
//!
//! Drive logs are line-oriented text, one event per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! 0:01.0 FOLLOW_DISTANCE 1.8
//! 0:02.5 LANE_CHANGE LEFT
//! 0:03.0 STOP_SIGN_DETECTED
//! 0:05.5 STOP_SIGN_CLEAR
//! 0:06.0 SPEED 40.0
//! 1:10.0 ODOMETER 0.8
//! ```
//!
//! The parser owns all input validation: argument arity per event kind,
//! numeric validity, non-negative readings, and the closed kind
//! vocabulary. Events that come out of here are trusted by the detector
//! without re-checks.

use std::path::Path;

use roadcheck_core::types::{Event, EventKind, LaneDirection, Timestamp};
use tracing::debug;

use crate::error::AnalysisError;

/// Maximum accepted log line length in bytes.
const MAX_LINE_LEN: usize = 1024;

/// Parser for the `MM:SS.s EVENT_TYPE [ARGUMENT]` drive log format.
#[derive(Debug, Default)]
pub struct EventLogParser;

impl EventLogParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a whole log file.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<Event>, AnalysisError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AnalysisError::Log {
                    path: path.display().to_string(),
                    line: 0,
                    reason: "file not found".to_owned(),
                }
            } else {
                AnalysisError::Io(e)
            }
        })?;
        let events = self.parse_str(&content, &path.display().to_string())?;
        debug!(path = %path.display(), events = events.len(), "drive log loaded");
        Ok(events)
    }

    /// Parse log content from a string.
    ///
    /// `origin` names the input in error messages (a path, or `"<memory>"`).
    pub fn parse_str(&self, content: &str, origin: &str) -> Result<Vec<Event>, AnalysisError> {
        let mut events = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            match Self::parse_line(raw) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(reason) => {
                    return Err(AnalysisError::Log {
                        path: origin.to_owned(),
                        line: idx + 1,
                        reason,
                    });
                }
            }
        }
        Ok(events)
    }

    /// Parse one log line. Returns `Ok(None)` for blank and comment lines.
    fn parse_line(raw: &str) -> Result<Option<Event>, String> {
        if raw.len() > MAX_LINE_LEN {
            return Err(format!("line exceeds {MAX_LINE_LEN} bytes"));
        }
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut parts = line.split_whitespace();
        let (Some(stamp), Some(kind_token)) = (parts.next(), parts.next()) else {
            return Err("expected 'TIMESTAMP EVENT_TYPE [ARGUMENT]'".to_owned());
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("{kind_token} has trailing input after its argument"));
        }

        let timestamp = Timestamp::parse(stamp).map_err(|e| e.to_string())?;
        let kind = match kind_token {
            "SPEED" => EventKind::Speed(Self::numeric_arg(kind_token, arg, "mph")?),
            "FOLLOW_DISTANCE" => {
                EventKind::FollowDistance(Self::numeric_arg(kind_token, arg, "meters")?)
            }
            "ODOMETER" => EventKind::Odometer(Self::numeric_arg(kind_token, arg, "miles")?),
            "LANE_CHANGE" => {
                let arg = arg.ok_or("LANE_CHANGE requires 'LEFT' or 'RIGHT'")?;
                let direction = LaneDirection::from_log_arg(arg)
                    .ok_or_else(|| format!("LANE_CHANGE requires 'LEFT' or 'RIGHT', got '{arg}'"))?;
                EventKind::LaneChange(direction)
            }
            "STOP_SIGN_DETECTED" => {
                Self::no_arg(kind_token, arg)?;
                EventKind::StopSignDetected
            }
            "STOP_SIGN_CLEAR" => {
                Self::no_arg(kind_token, arg)?;
                EventKind::StopSignClear
            }
            other => return Err(format!("unknown event type: {other}")),
        };

        Ok(Some(Event::new(timestamp, kind)))
    }

    /// Parse a required non-negative numeric argument.
    fn numeric_arg(kind: &str, arg: Option<&str>, unit: &str) -> Result<f64, String> {
        let arg = arg.ok_or_else(|| format!("{kind} requires a numeric argument ({unit})"))?;
        let value: f64 = arg
            .parse()
            .map_err(|_| format!("{kind}: invalid numeric value: {arg}"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{kind}: {unit} reading must be non-negative, got {arg}"));
        }
        Ok(value)
    }

    fn no_arg(kind: &str, arg: Option<&str>) -> Result<(), String> {
        match arg {
            None => Ok(()),
            Some(extra) => Err(format!("{kind} takes no arguments, got '{extra}'")),
        }
    }
}
