//! Analysis domain errors.
//!
//! [`AnalysisError`] covers scenario loading, log parsing, and detection.
//! `From<AnalysisError> for RoadcheckError` lets callers propagate with `?`
//! into the top-level error.

use roadcheck_core::error::{DetectError, ParseError, RoadcheckError};

/// Errors from scenario loading, log parsing, or violation detection.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Scenario file failed to load or validate.
    #[error("scenario error: {path}: {reason}")]
    Scenario {
        /// Scenario file path (or `"<memory>"` for in-memory input).
        path: String,
        /// Failure reason.
        reason: String,
    },

    /// A drive log line failed to parse.
    #[error("log error: {path}, line {line}: {reason}")]
    Log {
        /// Log file path (or `"<memory>"`).
        path: String,
        /// 1-based line number.
        line: usize,
        /// Failure reason.
        reason: String,
    },

    /// Events reached the detector out of chronological order.
    ///
    /// This is an integration bug in the caller, not a data problem: the
    /// loader always yields events in file order and drive logs are
    /// recorded chronologically.
    #[error("event timestamps must be non-decreasing: {next} follows {prev}")]
    OutOfOrder {
        /// Timestamp of the preceding event.
        prev: String,
        /// The offending (earlier) timestamp.
        next: String,
    },

    /// I/O error reading an input file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AnalysisError> for RoadcheckError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::OutOfOrder { .. } => RoadcheckError::Detect(DetectError::OutOfOrder {
                reason: err.to_string(),
            }),
            AnalysisError::Io(e) => RoadcheckError::Io(e),
            other => RoadcheckError::Parse(ParseError::Malformed {
                reason: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_error_display_carries_location() {
        let err = AnalysisError::Log {
            path: "run.log".to_owned(),
            line: 17,
            reason: "unknown event type: TELEPORT".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("run.log"));
        assert!(msg.contains("line 17"));
        assert!(msg.contains("TELEPORT"));
    }

    #[test]
    fn out_of_order_converts_to_detect_error() {
        let err = AnalysisError::OutOfOrder {
            prev: "00:02.0".to_owned(),
            next: "00:01.0".to_owned(),
        };
        let top: RoadcheckError = err.into();
        assert!(matches!(top, RoadcheckError::Detect(_)));
    }

    #[test]
    fn scenario_error_converts_to_parse_error() {
        let err = AnalysisError::Scenario {
            path: "city.json".to_owned(),
            reason: "road_rules missing key: max_speed".to_owned(),
        };
        let top: RoadcheckError = err.into();
        assert!(matches!(top, RoadcheckError::Parse(_)));
    }
}
