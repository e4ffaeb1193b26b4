//! Store domain errors.

use roadcheck_core::error::{RoadcheckError, StorageError};

/// Errors from the SQLite violation store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not open or create the database file.
    #[error("cannot open database at {path}: {reason}")]
    Open {
        /// Database path.
        path: String,
        /// Failure reason.
        reason: String,
    },

    /// A referenced scenario row does not exist.
    #[error("scenario {id} does not exist")]
    MissingScenario { id: i64 },

    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<StoreError> for RoadcheckError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Open { .. } => {
                RoadcheckError::Storage(StorageError::Connection(err.to_string()))
            }
            other => RoadcheckError::Storage(StorageError::Query(other.to_string())),
        }
    }
}
