//! Error types for sharer-core

use std::path::PathBuf;

/// Result type for sharer-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sharer-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No tool is stored under this id
    #[error("Tool not found: {id}")]
    NotFound { id: String },

    /// The tool exists but has no like counter (imported tools)
    #[error("Tool {id} was imported from a share link and cannot be liked")]
    NotLikeable { id: String },

    /// Share reference has no `#` separator
    #[error("Invalid or missing shared URL")]
    InvalidReference,

    /// Nothing follows the `#` separator
    #[error("No Base64 code found in the URL")]
    EmptyPayload,

    /// Payload is not Base64, or does not decode to UTF-8 text
    #[error("Failed to decode shared payload: {reason}")]
    Decode { reason: String },

    /// A required publish field is absent or blank
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// A record cannot be scored
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    /// The persisted collection could not be interpreted
    ///
    /// The store recovers from this by substituting an empty collection;
    /// it is never returned from store operations.
    #[error("Corrupt tool collection: {reason}")]
    Corruption { reason: String },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Unknown sort mode name
    #[error("Unknown sort mode '{0}'. Valid: newest, most-liked, trending")]
    UnknownSortMode(String),

    // Transparent wrappers for underlying errors
    /// Backing storage could not be read, written or locked
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sharer_fs::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means the requested tool does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
