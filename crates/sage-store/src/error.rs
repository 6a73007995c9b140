//! Store error type.

/// Errors surfaced by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Database(String),

    /// Row lookup miss.
    #[error("not found: {0}")]
    NotFound(String),

    /// JSON (de)serialization failure for a stored blob.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem failure while preparing the database location.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
