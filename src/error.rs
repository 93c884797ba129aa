//! Error types for typecov

use thiserror::Error;

/// Result type alias for typecov operations
pub type Result<T> = std::result::Result<T, CoverageError>;

/// Error types for typecov operations
#[derive(Error, Debug)]
pub enum CoverageError {
    /// File could not be opened or read
    #[error("Cannot open file '{path}': {reason}")]
    FileNotFound { path: String, reason: String },

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An `--ignore-files` pattern could not be compiled
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache directory or cache file could not be written or removed
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Persisted cache snapshot is not valid JSON
    #[error("Cache file is malformed: {0}")]
    CacheFormat(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}
