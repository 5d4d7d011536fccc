//! File-backed row store for CSV/TSV files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{RowFields, RowStore, WriteOutcome, append_row, find_row, update_row};
use crate::config::ColumnNames;
use crate::error::{KebabError, Result};
use crate::input::{Parser, ParserConfig, RawTable, SourceMetadata};

/// A delimited text file holding one row per observation.
///
/// The delimiter is detected on every read. A file that does not exist yet
/// reads as an empty table with the configured header and is created on the
/// first write. Writes replace the file through a temporary sibling and a
/// rename, so a reader never sees a half-written table.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    header: Vec<String>,
    id_column: String,
    parser: Parser,
}

impl CsvStore {
    pub fn open(path: impl Into<PathBuf>, columns: &ColumnNames) -> Self {
        Self {
            path: path.into(),
            header: columns.ordered().iter().map(|c| c.to_string()).collect(),
            id_column: columns.id.clone(),
            parser: Parser::new(),
        }
    }

    /// Use a fixed delimiter instead of detecting one.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.parser = Parser::with_config(ParserConfig {
            delimiter: Some(delimiter),
            ..ParserConfig::default()
        });
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table together with file metadata. `None` if the file does not
    /// exist yet.
    pub fn read_with_metadata(&self) -> Result<Option<(RawTable, SourceMetadata)>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let (table, metadata, _) = self.parser.parse_file(&self.path)?;
        Ok(Some((table, metadata)))
    }

    /// Current table and the delimiter to write it back with.
    fn load(&self) -> Result<(RawTable, u8)> {
        if !self.path.exists() {
            return Ok((
                RawTable::new(self.header.clone(), Vec::new()),
                default_delimiter(&self.path),
            ));
        }
        let (table, _, delimiter) = self.parser.parse_file(&self.path)?;
        Ok((table, delimiter))
    }

    fn write_table(&self, table: &RawTable, delimiter: u8) -> Result<()> {
        let temp = temp_path(&self.path);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        let written = write_delimited(&temp, table, delimiter)
            .and_then(|()| fs::rename(&temp, &self.path).map_err(io_error(&self.path)));
        if let Err(e) = written {
            // The table on disk is untouched; drop the partial copy.
            let _ = fs::remove_file(&temp);
            return Err(e);
        }

        debug!(
            path = %self.path.display(),
            rows = table.row_count(),
            "Wrote store"
        );
        Ok(())
    }
}

impl RowStore for CsvStore {
    fn read_all(&self) -> Result<RawTable> {
        self.load().map(|(table, _)| table)
    }

    fn append(&mut self, fields: &RowFields) -> Result<()> {
        let (mut table, delimiter) = self.load()?;
        append_row(&mut table, fields);
        self.write_table(&table, delimiter)
    }

    fn find_row_index(&self, id: u64) -> Result<Option<usize>> {
        let table = self.read_all()?;
        Ok(find_row(&table, &self.id_column, id))
    }

    fn update(&mut self, id: u64, fields: &RowFields) -> Result<WriteOutcome> {
        let (mut table, delimiter) = self.load()?;
        let Some(index) = find_row(&table, &self.id_column, id) else {
            return Ok(WriteOutcome::RowNotFound);
        };
        update_row(&mut table, index, fields);
        self.write_table(&table, delimiter)?;
        Ok(WriteOutcome::Applied)
    }

    fn delete(&mut self, id: u64) -> Result<WriteOutcome> {
        let (mut table, delimiter) = self.load()?;
        let Some(index) = find_row(&table, &self.id_column, id) else {
            return Ok(WriteOutcome::RowNotFound);
        };
        table.rows.remove(index);
        self.write_table(&table, delimiter)?;
        Ok(WriteOutcome::Applied)
    }

    fn id_column(&self) -> &str {
        &self.id_column
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Tab for `.tsv`/`.tab` files, comma otherwise.
fn default_delimiter(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => b'\t',
        _ => b',',
    }
}

fn write_delimited(path: &Path, table: &RawTable, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(io_error(path))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> KebabError {
    let path = path.to_path_buf();
    move |source| KebabError::Io { path, source }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fields(id: u64, weight: &str) -> RowFields {
        let mut f = RowFields::new();
        f.insert("id".into(), id.to_string());
        f.insert("gewicht_g".into(), weight.into());
        f
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::open(dir.path().join("kebabs.csv"), &ColumnNames::default());

        let table = store.read_all().unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns[0], "id");
        assert_eq!(store.next_id().unwrap(), 1);
        assert!(store.read_with_metadata().unwrap().is_none());
    }

    #[test]
    fn test_first_append_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kebabs.csv");
        let mut store = CsvStore::open(&path, &ColumnNames::default());

        store.append(&fields(1, "450")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,datum,gewicht_g,zubereitet,personen,uhrzeit"));
        assert!(content.contains("1,,450,,,"));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_keeps_detected_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kebabs.txt");
        fs::write(&path, "id;gewicht_g\n3;400\n1;410\n").unwrap();

        let mut store = CsvStore::open(&path, &ColumnNames::default());
        assert_eq!(store.next_id().unwrap(), 4);
        store.append(&fields(4, "420")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("4;420"));
        let (_, metadata) = store.read_with_metadata().unwrap().unwrap();
        assert_eq!(metadata.row_count, 3);
        assert_eq!(metadata.format, "csv-semicolon");
        assert!(metadata.hash.starts_with("sha256:"));
    }

    #[test]
    fn test_tsv_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kebabs.tsv");
        let mut store = CsvStore::open(&path, &ColumnNames::default());
        store.append(&fields(1, "450")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id\tdatum"));
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kebabs.csv");
        // A non-empty directory in the way makes the final rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let store = CsvStore::open(&path, &ColumnNames::default());
        let table = RawTable::new(vec!["id".into()], vec![vec!["1".into()]]);

        assert!(store.write_table(&table, b',').is_err());
        assert!(!temp_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_update_and_delete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kebabs.csv");
        let mut store = CsvStore::open(&path, &ColumnNames::default());
        store.append(&fields(1, "400")).unwrap();
        store.append(&fields(2, "450")).unwrap();

        assert_eq!(store.update(1, &fields(1, "999")).unwrap(), WriteOutcome::Applied);
        assert_eq!(store.delete(2).unwrap(), WriteOutcome::Applied);
        assert_eq!(store.delete(2).unwrap(), WriteOutcome::RowNotFound);
        assert_eq!(store.update(7, &fields(7, "1")).unwrap(), WriteOutcome::RowNotFound);

        let table = store.read_all().unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0][2], "999");
    }
}
