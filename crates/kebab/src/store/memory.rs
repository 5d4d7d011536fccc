//! In-memory row store.

use super::{RowFields, RowStore, WriteOutcome, append_row, find_row, update_row};
use crate::config::ColumnNames;
use crate::error::Result;
use crate::input::RawTable;

/// A table held in memory. Used by tests and when embedding the ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: RawTable,
    id_column: String,
}

impl MemoryStore {
    /// Empty store with a header in store order.
    pub fn new(columns: &ColumnNames) -> Self {
        let header = columns.ordered().iter().map(|c| c.to_string()).collect();
        Self {
            table: RawTable::new(header, Vec::new()),
            id_column: columns.id.clone(),
        }
    }

    /// Wrap an existing table.
    pub fn from_table(table: RawTable, id_column: impl Into<String>) -> Self {
        Self {
            table,
            id_column: id_column.into(),
        }
    }

    pub fn table(&self) -> &RawTable {
        &self.table
    }
}

impl RowStore for MemoryStore {
    fn read_all(&self) -> Result<RawTable> {
        Ok(self.table.clone())
    }

    fn append(&mut self, fields: &RowFields) -> Result<()> {
        append_row(&mut self.table, fields);
        Ok(())
    }

    fn find_row_index(&self, id: u64) -> Result<Option<usize>> {
        Ok(find_row(&self.table, &self.id_column, id))
    }

    fn update(&mut self, id: u64, fields: &RowFields) -> Result<WriteOutcome> {
        match find_row(&self.table, &self.id_column, id) {
            Some(index) => {
                update_row(&mut self.table, index, fields);
                Ok(WriteOutcome::Applied)
            }
            None => Ok(WriteOutcome::RowNotFound),
        }
    }

    fn delete(&mut self, id: u64) -> Result<WriteOutcome> {
        match find_row(&self.table, &self.id_column, id) {
            Some(index) => {
                self.table.rows.remove(index);
                Ok(WriteOutcome::Applied)
            }
            None => Ok(WriteOutcome::RowNotFound),
        }
    }

    fn id_column(&self) -> &str {
        &self.id_column
    }

    fn describe(&self) -> String {
        format!("memory ({} rows)", self.table.row_count())
    }
}
