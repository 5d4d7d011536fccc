//! Conditions recorded while normalizing.
//!
//! These are values, not errors: `normalize` always returns, and callers
//! inspect the issue list to decide what to show.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How much an issue affects the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// One row lost a derived field.
    Info,
    /// A column is degraded.
    Warning,
    /// Nothing could be normalized.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// A condition found while normalizing a batch of rows.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizationIssue {
    /// The header has no id column; the record set is empty.
    #[error("column '{column}' is missing (found: {})", .found.join(", "))]
    MissingIdColumn { column: String, found: Vec<String> },

    /// A non-id column is absent; its field is empty in every record.
    #[error("column '{column}' is missing")]
    MissingColumn { column: String },

    /// Some cells of a numeric column did not coerce.
    #[error("{failed} of {total} values in '{column}' are not integers")]
    DataTypeError {
        column: String,
        failed: usize,
        total: usize,
        /// Every non-empty cell failed; numeric analyses treat the column as empty.
        unusable: bool,
    },

    /// The row's date and time did not parse under the configured format.
    #[error("row {id}: '{text}' does not match the timestamp format")]
    TimestampParseError { id: u64, text: String },
}

impl NormalizationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            NormalizationIssue::MissingIdColumn { .. } => Severity::Error,
            NormalizationIssue::MissingColumn { .. } => Severity::Warning,
            NormalizationIssue::DataTypeError { .. } => Severity::Warning,
            NormalizationIssue::TimestampParseError { .. } => Severity::Info,
        }
    }

    /// Whether the issue halted normalization.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NormalizationIssue::MissingIdColumn { .. })
    }
}

/// Failure to read a cell as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{text}' is not an integer")]
pub struct CoercionError {
    pub text: String,
}

/// Coerce a text cell to an integer.
///
/// Accepts plain integers and floats with a zero fraction (`"450.0"`), which
/// is how spreadsheet exports often render whole numbers.
pub fn coerce_integer(text: &str) -> Result<i64, CoercionError> {
    let trimmed = text.trim();

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 => {
            Ok(value as i64)
        }
        _ => Err(CoercionError {
            text: text.to_string(),
        }),
    }
}
