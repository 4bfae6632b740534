//! Error types for calboard.

use thiserror::Error;

/// Errors that can occur in calboard operations.
#[derive(Error, Debug)]
pub enum CalBoardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Import failed: {0}")]
    MalformedImport(String),

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Invalid slot id '{0}'. Expected <event-id>-<slot-index>")]
    InvalidSlotKey(String),
}

impl From<serde_json::Error> for CalBoardError {
    fn from(e: serde_json::Error) -> Self {
        CalBoardError::Serialization(e.to_string())
    }
}

/// Result type alias for calboard operations.
pub type CalBoardResult<T> = Result<T, CalBoardError>;
