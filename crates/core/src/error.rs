//! Error types -- domain errors by concern.

/// Top-level roadcheck error.
#[derive(Debug, thiserror::Error)]
pub enum RoadcheckError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Scenario or log parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Violation detection error.
    #[error("detection error: {0}")]
    Detect(#[from] DetectError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file missing.
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// TOML parse failure.
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// A field holds an unusable value.
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Input parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A log timestamp does not match `M:SS` / `M:SS.s`.
    #[error("invalid timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },

    /// A scenario or log input failed validation.
    #[error("malformed input: {reason}")]
    Malformed { reason: String },
}

/// Detection errors.
///
/// Detection is a pure pass over already-validated events; the only
/// failure mode is a caller breaking the ordering precondition.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// Event timestamps went backwards.
    #[error("event order precondition violated: {reason}")]
    OutOfOrder { reason: String },
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Could not open or create the database.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A statement failed.
    #[error("query failed: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_carries_path() {
        let err = RoadcheckError::Config(ConfigError::FileNotFound {
            path: "roadcheck.toml".to_owned(),
        });
        assert!(err.to_string().contains("roadcheck.toml"));
    }

    #[test]
    fn parse_error_display_carries_value_and_reason() {
        let err = ParseError::Timestamp {
            value: "1:99".to_owned(),
            reason: "seconds must be in [0, 60)".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1:99"));
        assert!(msg.contains("[0, 60)"));
    }

    #[test]
    fn detect_error_wraps_into_top_level() {
        let err: RoadcheckError = DetectError::OutOfOrder {
            reason: "00:01.0 after 00:02.0".to_owned(),
        }
        .into();
        assert!(matches!(err, RoadcheckError::Detect(_)));
        assert!(err.to_string().starts_with("detection error"));
    }
}
