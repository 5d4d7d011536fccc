//! Row stores: where raw rows live between reads.
//!
//! A store only moves text rows in and out. It never interprets cells beyond
//! locating a row by its id; all typing happens in the normalizer.

mod csv_store;
mod entry;
mod memory;

pub use csv_store::CsvStore;
pub use entry::{Entry, MAX_HEADCOUNT, MAX_WEIGHT_G};
pub use memory::MemoryStore;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::RawTable;
use crate::normalize::coerce_integer;

/// Cells of one row keyed by column name.
pub type RowFields = IndexMap<String, String>;

/// Result of an update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Applied,
    /// No row carries the id; nothing was written.
    RowNotFound,
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied)
    }
}

/// Read/append/update/delete over a tabular store.
pub trait RowStore {
    /// The whole table, header included.
    fn read_all(&self) -> Result<RawTable>;

    /// Append a row. Columns the store does not have yet are added.
    fn append(&mut self, fields: &RowFields) -> Result<()>;

    /// Position of the row with this id among the data rows.
    fn find_row_index(&self, id: u64) -> Result<Option<usize>>;

    /// Overwrite the named cells of the row with this id.
    fn update(&mut self, id: u64, fields: &RowFields) -> Result<WriteOutcome>;

    fn delete(&mut self, id: u64) -> Result<WriteOutcome>;

    /// Name of the id column rows are located by.
    fn id_column(&self) -> &str;

    /// Short human-readable name for logs.
    fn describe(&self) -> String;

    /// The id the next appended row should carry.
    fn next_id(&self) -> Result<u64> {
        let table = self.read_all()?;
        Ok(match table.column_index(self.id_column()) {
            Some(index) => next_id(table.column_values(index)),
            None => 1,
        })
    }
}

/// One more than the largest id, or 1 if there is none.
///
/// Cells count as ids under the same rule the normalizer applies: a positive
/// integer, possibly written with a zero fraction (`"4.0"`). Anything else is
/// ignored.
pub fn next_id<I, S>(ids: I) -> u64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .filter_map(|id| coerce_integer(id.as_ref()).ok())
        .filter(|&id| id > 0)
        .map(|id| id as u64)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

// ============================================================================
// Table edits shared by the stores
// ============================================================================

/// Position of the row whose id cell denotes `id`.
pub(crate) fn find_row(table: &RawTable, id_column: &str, id: u64) -> Option<usize> {
    let index = table.column_index(id_column)?;
    table
        .column_values(index)
        .position(|cell| coerce_integer(cell).is_ok_and(|v| v >= 0 && v as u64 == id))
}

/// Column index for a field name, adding the column if it is missing.
fn ensure_column(table: &mut RawTable, name: &str) -> usize {
    if let Some(index) = table.column_index(name) {
        return index;
    }
    table.columns.push(name.to_string());
    for row in &mut table.rows {
        row.push(String::new());
    }
    table.columns.len() - 1
}

pub(crate) fn append_row(table: &mut RawTable, fields: &RowFields) {
    let indices: Vec<(usize, &String)> = fields
        .iter()
        .map(|(name, value)| (ensure_column(table, name), value))
        .collect();

    let mut row = vec![String::new(); table.columns.len()];
    for (index, value) in indices {
        row[index] = value.clone();
    }
    table.rows.push(row);
}

pub(crate) fn update_row(table: &mut RawTable, index: usize, fields: &RowFields) {
    for (name, value) in fields {
        let column = ensure_column(table, name);
        if let Some(cell) = table.rows.get_mut(index).and_then(|row| row.get_mut(column)) {
            *cell = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::new(
            vec!["id".into(), "name".into()],
            vec![
                vec!["3".into(), "a".into()],
                vec!["1".into(), "b".into()],
                vec!["4.0".into(), "c".into()],
            ],
        )
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(["3", "1", "4"]), 5);
        assert_eq!(next_id(Vec::<String>::new()), 1);
        assert_eq!(next_id(["abc", "", "x7"]), 1);
        assert_eq!(next_id(["2", "10", "-20", "4.5"]), 11);
        assert_eq!(next_id([" 12 "]), 13);
    }

    #[test]
    fn test_next_id_counts_whole_floats() {
        assert_eq!(next_id(["4.0"]), 5);
        assert_eq!(next_id(["3", "7.0", "0", "-9"]), 8);
        assert_eq!(next_id(table().column_values(0)), 5);
    }

    #[test]
    fn test_find_row_accepts_float_ids() {
        let t = table();
        assert_eq!(find_row(&t, "id", 1), Some(1));
        assert_eq!(find_row(&t, "ID ", 4), Some(2));
        assert_eq!(find_row(&t, "id", 9), None);
        assert_eq!(find_row(&t, "missing", 1), None);
    }

    #[test]
    fn test_append_adds_missing_columns() {
        let mut t = table();
        let mut fields = RowFields::new();
        fields.insert("id".into(), "5".into());
        fields.insert("extra".into(), "x".into());
        append_row(&mut t, &fields);

        assert_eq!(t.columns, vec!["id", "name", "extra"]);
        assert_eq!(t.rows[3], vec!["5", "", "x"]);
        assert_eq!(t.rows[0].len(), 3);
    }

    #[test]
    fn test_update_keeps_other_cells() {
        let mut t = table();
        let mut fields = RowFields::new();
        fields.insert("id".into(), "1".into());
        update_row(&mut t, 1, &fields);
        assert_eq!(t.rows[1], vec!["1", "b"]);
    }
}
