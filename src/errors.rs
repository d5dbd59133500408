/*!
 * Error types for the wortwirbel service.
 *
 * This module contains the error taxonomy shared by the repository, the
 * application service and the HTTP layer, using the thiserror crate for
 * ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the underlying store for infrastructure reasons
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error reported by SQLite
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Error encoding or decoding a JSON column
    #[error("JSON column error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be mapped back to a word
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// The schema could not be brought to the current version
    #[error("Schema migration failed: {0}")]
    Migration(String),

    /// The connection mutex was poisoned by a panicking holder
    #[error("Failed to acquire database lock: {0}")]
    LockPoisoned(String),

    /// The blocking database task did not complete
    #[error("Database task failed: {0}")]
    TaskFailed(String),

    /// Error preparing the database file location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by word operations
#[derive(Error, Debug)]
pub enum WordError {
    /// Malformed or missing required input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness invariant would be violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The referenced word does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store is unreachable or rejected the operation
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl WordError {
    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<rusqlite::Error> for WordError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Sqlite(error))
    }
}

impl From<serde_json::Error> for WordError {
    fn from(error: serde_json::Error) -> Self {
        Self::Storage(StorageError::Serialization(error))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a word operation
    #[error("Word error: {0}")]
    Word(#[from] WordError),

    /// Error from the store while starting up
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error from a file or socket operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Config(error.to_string())
    }
}
