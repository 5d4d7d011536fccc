//! Raw tabular data as it comes out of a row store.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ColumnNames;

/// Metadata about a file-backed store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has just been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            read_at: Utc::now(),
        }
    }
}

/// A loosely typed table: header names plus rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names as stored (not normalized).
    pub columns: Vec<String>,
    /// Row data as strings (row-major order), padded to the header width.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a new table, padding or truncating rows to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column, comparing lower-cased and trimmed names.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.columns
            .iter()
            .position(|c| normalize_header(c) == wanted)
    }

    /// All values of one column.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Map every row onto the explicit optional-field row type.
    pub fn raw_rows(&self, names: &ColumnNames) -> Vec<RawRow> {
        let id = self.column_index(&names.id);
        let date = self.column_index(&names.date);
        let weight = self.column_index(&names.weight);
        let preparer = self.column_index(&names.preparer);
        let headcount = self.column_index(&names.headcount);
        let time = self.column_index(&names.time);

        let cell = |row: &[String], index: Option<usize>| -> Option<String> {
            let value = row.get(index?)?;
            if is_null_value(value) {
                None
            } else {
                Some(value.clone())
            }
        };

        self.rows
            .iter()
            .map(|row| RawRow {
                id: cell(row, id),
                date: cell(row, date),
                weight: cell(row, weight),
                preparer: cell(row, preparer),
                headcount: cell(row, headcount),
                time: cell(row, time),
            })
            .collect()
    }
}

/// One row before normalization. `None` marks an absent column or a
/// null-like cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub id: Option<String>,
    pub date: Option<String>,
    pub weight: Option<String>,
    pub preparer: Option<String>,
    pub headcount: Option<String>,
    pub time: Option<String>,
}

impl RawRow {
    /// Row with only an id set; the other fields are filled by the `with_*` builders.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the date text.
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the time text.
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Set the weight text.
    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    /// Set the preparer text.
    pub fn preparer(mut self, preparer: impl Into<String>) -> Self {
        self.preparer = Some(preparer.into());
        self
    }

    /// Set the headcount text.
    pub fn headcount(mut self, headcount: impl Into<String>) -> Self {
        self.headcount = Some(headcount.into());
        self
    }
}

/// Lower-case and trim a header name.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check if a value represents a missing/null value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::new(
            vec![" ID ".into(), "Datum".into(), "gewicht_g".into()],
            vec![
                vec!["1".into(), "15.03.2025".into(), "450".into()],
                vec!["".into(), "NA".into()],
            ],
        )
    }

    #[test]
    fn test_rows_padded_to_header_width() {
        let t = table();
        assert_eq!(t.rows[1].len(), 3);
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn test_column_index_ignores_case_and_whitespace() {
        let t = table();
        assert_eq!(t.column_index("id"), Some(0));
        assert_eq!(t.column_index("DATUM"), Some(1));
        assert_eq!(t.column_index("personen"), None);
    }

    #[test]
    fn test_raw_rows_maps_nulls_and_missing_columns() {
        let rows = table().raw_rows(&ColumnNames::default());
        assert_eq!(rows[0].id.as_deref(), Some("1"));
        assert_eq!(rows[0].weight.as_deref(), Some("450"));
        assert_eq!(rows[0].headcount, None);
        assert_eq!(rows[1].id, None);
        assert_eq!(rows[1].date, None);
    }

    #[test]
    fn test_is_null_value() {
        assert!(is_null_value(""));
        assert!(is_null_value("   "));
        assert!(is_null_value("NA"));
        assert!(is_null_value("NaN"));
        assert!(is_null_value("null"));
        assert!(is_null_value("-"));
        assert!(!is_null_value("0"));
        assert!(!is_null_value("OG"));
    }
}
