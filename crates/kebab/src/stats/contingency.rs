//! Contingency tables and the chi-square independence test.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::distribution::chi_square_upper_tail;
use super::group::{GroupBy, GroupKey};
use crate::config::StatsConfig;
use crate::normalize::RecordSet;

/// Observed counts. Rows and columns follow [`GroupKey`] ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub row_by: GroupBy,
    pub col_by: GroupBy,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `counts[row][column]`
    pub counts: Vec<Vec<u64>>,
}

impl ContingencyTable {
    /// Cross-tabulate records, skipping any record missing either key or whose
    /// row or column label is in `exclude`.
    pub fn build(records: &RecordSet, row_by: GroupBy, col_by: GroupBy, exclude: &[String]) -> Self {
        let is_excluded = |key: &GroupKey| exclude.iter().any(|e| *e == key.label());

        let mut cells: BTreeMap<(GroupKey, GroupKey), u64> = BTreeMap::new();
        let mut row_keys = BTreeSet::new();
        let mut col_keys = BTreeSet::new();

        for record in records {
            let (Some(row), Some(col)) = (row_by.key(record), col_by.key(record)) else {
                continue;
            };
            if is_excluded(&row) || is_excluded(&col) {
                continue;
            }
            row_keys.insert(row.clone());
            col_keys.insert(col.clone());
            *cells.entry((row, col)).or_default() += 1;
        }

        let counts = row_keys
            .iter()
            .map(|row| {
                col_keys
                    .iter()
                    .map(|col| {
                        cells
                            .get(&(row.clone(), col.clone()))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect()
            })
            .collect();

        Self {
            row_by,
            col_by,
            rows: row_keys.iter().map(GroupKey::label).collect(),
            columns: col_keys.iter().map(GroupKey::label).collect(),
            counts,
        }
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.columns.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.row_totals().iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Each row's share per column, in percent. Rows without any count are
    /// left out.
    pub fn probabilities(&self) -> ProbabilityTable {
        let mut rows = IndexMap::new();
        for (label, (counts, total)) in self
            .rows
            .iter()
            .zip(self.counts.iter().zip(self.row_totals()))
        {
            if total == 0 {
                continue;
            }
            let shares = counts
                .iter()
                .map(|&c| c as f64 / total as f64 * 100.0)
                .collect();
            rows.insert(label.clone(), shares);
        }

        ProbabilityTable {
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// Row-normalized percentages for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    pub columns: Vec<String>,
    pub rows: IndexMap<String, Vec<f64>>,
}

impl ProbabilityTable {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let j = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).and_then(|shares| shares.get(j).copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    pub chi2: f64,
    pub dof: usize,
    pub p_value: f64,
    /// Yates continuity correction was applied (2×2 tables).
    pub corrected: bool,
    pub significant: bool,
}

impl ChiSquareTest {
    /// Pearson chi-square on a table with at least two rows and columns.
    pub fn from_table(table: &ContingencyTable, significance: f64) -> Option<Self> {
        let rows = table.rows.len();
        let cols = table.columns.len();
        if rows < 2 || cols < 2 {
            return None;
        }

        let row_totals = table.row_totals();
        let col_totals = table.column_totals();
        let n = table.total() as f64;
        if n == 0.0 {
            return None;
        }

        let dof = (rows - 1) * (cols - 1);
        let corrected = dof == 1;

        let mut chi2 = 0.0;
        for (i, row) in table.counts.iter().enumerate() {
            for (j, &observed) in row.iter().enumerate() {
                let expected = row_totals[i] as f64 * col_totals[j] as f64 / n;
                if expected == 0.0 {
                    continue;
                }
                let mut diff = (observed as f64 - expected).abs();
                if corrected {
                    diff = (diff - 0.5).max(0.0);
                }
                chi2 += diff * diff / expected;
            }
        }

        let p_value = chi_square_upper_tail(chi2, dof as f64);
        Some(Self {
            chi2,
            dof,
            p_value,
            corrected,
            significant: p_value < significance,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TestOutcome {
    /// Fewer than two row or column categories remain.
    InsufficientData,
    Tested(ChiSquareTest),
}

/// Result of [`independence_test`]: the tables are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependenceTest {
    pub table: ContingencyTable,
    pub probabilities: ProbabilityTable,
    pub test: TestOutcome,
}

/// Chi-square test of independence between two groupings.
pub fn independence_test(
    records: &RecordSet,
    row_key: GroupBy,
    col_key: GroupBy,
    exclude_values: &[String],
    config: &StatsConfig,
) -> IndependenceTest {
    let table = ContingencyTable::build(records, row_key, col_key, exclude_values);
    let probabilities = table.probabilities();
    let test = match ChiSquareTest::from_table(&table, config.significance) {
        Some(test) => TestOutcome::Tested(test),
        None => TestOutcome::InsufficientData,
    };

    IndependenceTest {
        table,
        probabilities,
        test,
    }
}
