//! CLI-specific error types and exit code mapping

use roadcheck_analysis::AnalysisError;
use roadcheck_core::error::RoadcheckError;
use roadcheck_store::StoreError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-facing message; the
/// `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Scenario loading, log parsing, or detection failed.
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    /// Violation store failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Wrapped domain error from roadcheck-core.
    #[error("{0}")]
    Core(#[from] RoadcheckError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                      |
    /// |------|------------------------------|
    /// | 0    | Success                      |
    /// | 1    | General / command error      |
    /// | 2    | Configuration error          |
    /// | 3    | Storage error                |
    /// | 10   | IO error                     |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(RoadcheckError::Config(_)) => 2,
            Self::Store(_) | Self::Core(RoadcheckError::Storage(_)) => 3,
            Self::Io(_) => 10,
            Self::Command(_)
            | Self::Analysis(_)
            | Self::Core(_)
            | Self::JsonSerialize(_) => 1,
        }
    }
}
