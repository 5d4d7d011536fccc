//! Error types for the kebab library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ledger operations.
///
/// Parsing and statistical edge cases never surface here; they resolve to
/// outcome values (`NormalizationIssue`, `InsufficientData`, `RowNotFound`).
/// This type is reserved for failures of the surrounding plumbing.
#[derive(Debug, Error)]
pub enum KebabError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An entry failed validation before being written.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Empty file or no columns to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The row store rejected an operation.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, KebabError>;
