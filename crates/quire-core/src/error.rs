//! Error types for Quire core operations.
//!
//! Absence of a record is not an error: lookups return `Ok(None)` or an
//! empty `Vec`. Errors are descriptive at the core level; the CLI layer maps
//! them to user-facing messages.

use thiserror::Error;

/// Result type alias for Quire operations.
pub type Result<T> = std::result::Result<T, QuireError>;

/// Core error type for Quire operations.
#[derive(Debug, Error)]
pub enum QuireError {
    /// A user with this username already exists
    #[error("User {0} already exists")]
    DuplicateIdentity(String),

    /// Password failed the strength gate
    #[error("Password is too weak (score {score}, minimum {minimum})")]
    WeakCredential { score: i32, minimum: i32 },

    /// The password hashing transform itself failed
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    /// A mutation targeted a record that does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The site has already been installed
    #[error("Site is already initialized")]
    AlreadyInstalled,

    /// Comments are switched off in site settings
    #[error("Comments are disabled on this site")]
    CommentsDisabled,

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl From<tokio::task::JoinError> for QuireError {
    fn from(err: tokio::task::JoinError) -> Self {
        QuireError::Storage(format!("Background task failed: {}", err))
    }
}
