//! Error types for the stargaze core
//!
//! Centralized error handling using thiserror. Every variant is
//! recoverable; none of them should take the application down.

use thiserror::Error;

use crate::favorites::Change;

/// Failure reported by a key-value storage backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage read failed: {0}")]
    Read(String),

    #[error("Storage write failed: {0}")]
    Write(String),
}

/// Errors produced by the favorites manager
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FavoritesError {
    /// The id is neither in the current catalog nor already a favorite
    #[error("Item not found: {0}")]
    NotFound(String),

    /// The persisted favorites record could not be read back
    #[error("Stored favorites are unreadable, starting empty: {0}")]
    CorruptState(String),

    /// The in-memory change stands but did not reach durable storage
    #[error("Favorite '{id}' was {change} but could not be saved: {reason}")]
    StorageWriteFailed {
        id: String,
        change: Change,
        reason: StorageError,
    },
}

impl FavoritesError {
    /// The change that was committed in memory despite the error, if any
    pub fn committed_change(&self) -> Option<Change> {
        match self {
            FavoritesError::StorageWriteFailed { change, .. } => Some(*change),
            _ => None,
        }
    }
}

/// Result type alias for the favorites manager
pub type Result<T> = std::result::Result<T, FavoritesError>;
