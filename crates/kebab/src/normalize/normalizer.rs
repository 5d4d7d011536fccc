//! Raw rows to analysis-ready records.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Timelike};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::issue::{NormalizationIssue, coerce_integer};
use super::record::{Record, RecordSet};
use crate::config::{ColumnNames, NormalizerConfig};
use crate::input::{RawRow, RawTable, is_null_value, normalize_header};

/// Output of one normalization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub records: RecordSet,
    pub issues: Vec<NormalizationIssue>,
}

impl Normalization {
    /// Whether normalization halted on a fatal issue.
    pub fn is_fatal(&self) -> bool {
        self.issues.iter().any(NormalizationIssue::is_fatal)
    }

    /// Column-level issues (everything except per-row timestamp failures).
    pub fn column_issues(&self) -> impl Iterator<Item = &NormalizationIssue> {
        self.issues
            .iter()
            .filter(|i| !matches!(i, NormalizationIssue::TimestampParseError { .. }))
    }

    /// Number of rows whose timestamp did not parse.
    pub fn timestamp_failures(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, NormalizationIssue::TimestampParseError { .. }))
            .count()
    }
}

/// Per-column coercion counts.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    non_empty: usize,
    failed: usize,
}

impl Tally {
    fn unusable(&self) -> bool {
        self.non_empty > 0 && self.failed == self.non_empty
    }

    fn issue(&self, column: &str) -> Option<NormalizationIssue> {
        (self.failed > 0).then(|| NormalizationIssue::DataTypeError {
            column: column.to_string(),
            failed: self.failed,
            total: self.non_empty,
            unusable: self.unusable(),
        })
    }
}

/// Converts raw text rows into [`Record`]s.
///
/// Built once per configuration; `normalize` is pure and may be called any
/// number of times.
#[derive(Debug, Clone)]
pub struct Normalizer {
    columns: ColumnNames,
    config: NormalizerConfig,
    aliases: IndexMap<String, String>,
}

impl Normalizer {
    /// Create a normalizer. Alias keys and targets are canonicalized the
    /// same way preparer labels are; aliases with a blank side are skipped.
    pub fn new(columns: ColumnNames, config: NormalizerConfig) -> Self {
        let aliases = config
            .aliases
            .iter()
            .map(|(from, to)| (canonical_label(from), canonical_label(to)))
            .filter(|(from, to)| !from.is_empty() && !to.is_empty())
            .collect();

        Self {
            columns,
            config,
            aliases,
        }
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a table read from a store.
    pub fn normalize_table(&self, table: &RawTable) -> Normalization {
        self.normalize(&table.raw_rows(&self.columns), &table.columns)
    }

    /// Normalize rows given the header they were read with.
    pub fn normalize<S: AsRef<str>>(&self, rows: &[RawRow], column_names: &[S]) -> Normalization {
        let header: HashSet<String> = column_names
            .iter()
            .map(|c| normalize_header(c.as_ref()))
            .collect();
        let has = |name: &str| header.contains(&normalize_header(name));

        let id_column = normalize_header(&self.columns.id);
        if !header.contains(&id_column) {
            let found: Vec<String> = column_names
                .iter()
                .map(|c| normalize_header(c.as_ref()))
                .collect();
            tracing::warn!(?found, "no '{}' column; nothing to normalize", id_column);
            return Normalization {
                records: RecordSet::empty(),
                issues: vec![NormalizationIssue::MissingIdColumn {
                    column: id_column,
                    found,
                }],
            };
        }

        let has_date = has(&self.columns.date);
        let has_time = has(&self.columns.time);
        let has_weight = has(&self.columns.weight);
        let has_headcount = has(&self.columns.headcount);
        let has_preparer = has(&self.columns.preparer);

        let mut issues = Vec::new();
        for (present, name) in [
            (has_date, &self.columns.date),
            (has_weight, &self.columns.weight),
            (has_preparer, &self.columns.preparer),
            (has_headcount, &self.columns.headcount),
            (has_time, &self.columns.time),
        ] {
            if !present {
                issues.push(NormalizationIssue::MissingColumn {
                    column: normalize_header(name),
                });
            }
        }

        let mut id_tally = Tally::default();
        let mut weight_tally = Tally::default();
        let mut headcount_tally = Tally::default();
        let mut timestamp_issues = Vec::new();
        let mut records = Vec::new();

        for row in rows {
            let Some(id_text) = cell(&row.id, true) else {
                continue;
            };

            id_tally.non_empty += 1;
            let id = match coerce_integer(id_text) {
                Ok(id) if id > 0 => id as u64,
                _ => {
                    id_tally.failed += 1;
                    tracing::debug!(id = id_text, "dropping row with unusable id");
                    continue;
                }
            };

            let weight_g = coerce_cell(cell(&row.weight, has_weight), &mut weight_tally);
            let headcount = coerce_cell(cell(&row.headcount, has_headcount), &mut headcount_tally);

            let date = cell(&row.date, has_date);
            let time = cell(&row.time, has_time);
            let timestamp = match (date, time) {
                (Some(d), Some(t)) => self.config.timestamp.parse(d, t).ok(),
                _ => None,
            };
            if timestamp.is_none() && has_date && has_time {
                let text = super::TimestampFormat::join(date.unwrap_or(""), time.unwrap_or(""));
                tracing::debug!(id, %text, "timestamp did not parse");
                timestamp_issues.push(NormalizationIssue::TimestampParseError { id, text });
            }

            let weekday = timestamp.map(|ts| ts.weekday());
            let weekday_label = weekday
                .map(|wd| self.config.weekday_labels[wd.num_days_from_monday() as usize].clone());
            let hour_of_day = timestamp.map(|ts| ts.hour() as f64 + ts.minute() as f64 / 60.0);
            let hour_int = timestamp.map(|ts| ts.hour());

            let preparer_raw = cell(&row.preparer, has_preparer)
                .map(str::to_string)
                .unwrap_or_default();
            let preparer_key = self.preparer_key(&preparer_raw);

            records.push(Record {
                id,
                timestamp,
                weight_g,
                headcount,
                preparer_raw,
                preparer_key,
                weekday,
                weekday_label,
                hour_of_day,
                hour_int,
            });
        }

        issues.extend(id_tally.issue(&self.columns.id));
        issues.extend(weight_tally.issue(&self.columns.weight));
        issues.extend(headcount_tally.issue(&self.columns.headcount));
        issues.extend(timestamp_issues);

        tracing::debug!(
            rows = rows.len(),
            records = records.len(),
            issues = issues.len(),
            "normalized rows"
        );

        Normalization {
            records: RecordSet::new(
                records,
                has_weight && !weight_tally.unusable(),
                has_headcount && !headcount_tally.unusable(),
            ),
            issues,
        }
    }

    /// Normalized preparer identity: upper-cased, whitespace removed, alias resolved.
    pub fn preparer_key(&self, raw: &str) -> String {
        let key = canonical_label(raw);
        match self.aliases.get(&key) {
            Some(alias) => alias.clone(),
            None => key,
        }
    }

    /// Sorted, deduplicated union of the configured seed labels and every
    /// preparer key in `records`.
    pub fn known_preparers(&self, records: &RecordSet) -> Vec<String> {
        known_preparers(records, &self.config.known_preparers)
    }
}

/// Sorted, deduplicated union of `seed` and every non-empty preparer key.
pub fn known_preparers(records: &RecordSet, seed: &[String]) -> Vec<String> {
    let mut known: BTreeSet<String> = seed
        .iter()
        .map(|s| canonical_label(s))
        .filter(|s| !s.is_empty())
        .collect();

    known.extend(
        records
            .iter()
            .filter(|r| !r.preparer_key.is_empty())
            .map(|r| r.preparer_key.clone()),
    );

    known.into_iter().collect()
}

/// Upper-case a label and remove all whitespace.
pub fn canonical_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Text of a field, or `None` for absent columns and null-like cells.
fn cell(value: &Option<String>, column_present: bool) -> Option<&str> {
    if !column_present {
        return None;
    }
    value.as_deref().filter(|v| !is_null_value(v))
}

fn coerce_cell(text: Option<&str>, tally: &mut Tally) -> Option<i64> {
    let text = text?;
    tally.non_empty += 1;
    match coerce_integer(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tally.failed += 1;
            tracing::debug!(error = %e, "numeric coercion failed");
            None
        }
    }
}
