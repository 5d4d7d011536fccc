//! Normalized records and the immutable record set.

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One observation after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique positive id.
    pub id: u64,
    /// Combined date and time; `None` when either part failed to parse.
    pub timestamp: Option<NaiveDateTime>,
    /// Weight in grams.
    pub weight_g: Option<i64>,
    /// Number of people waiting.
    pub headcount: Option<i64>,
    /// Preparer label as entered.
    pub preparer_raw: String,
    /// Upper-cased, whitespace-free, alias-resolved preparer identity.
    pub preparer_key: String,
    pub weekday: Option<Weekday>,
    /// Configured label of `weekday`.
    pub weekday_label: Option<String>,
    /// `hour + minute / 60`.
    pub hour_of_day: Option<f64>,
    pub hour_int: Option<u32>,
}

impl Record {
    /// Whether the timestamp parsed.
    pub fn has_timestamp(&self) -> bool {
        self.timestamp.is_some()
    }
}

/// The snapshot produced by one normalization pass.
///
/// Numeric accessors honour column usability: when every non-empty cell of a
/// numeric column failed coercion, the column reads as empty instead of
/// leaking garbage into means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    records: Vec<Record>,
    weight_usable: bool,
    headcount_usable: bool,
}

impl RecordSet {
    /// Build a record set with explicit column usability.
    pub fn new(records: Vec<Record>, weight_usable: bool, headcount_usable: bool) -> Self {
        Self {
            records,
            weight_usable,
            headcount_usable,
        }
    }

    /// Build a record set whose numeric columns are all usable.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::new(records, true, true)
    }

    /// The well-defined "no data" value.
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn weight_usable(&self) -> bool {
        self.weight_usable
    }

    pub fn headcount_usable(&self) -> bool {
        self.headcount_usable
    }

    /// Weight of a record, if present and the column is usable.
    pub fn weight_of(&self, record: &Record) -> Option<f64> {
        if self.weight_usable {
            record.weight_g.map(|w| w as f64)
        } else {
            None
        }
    }

    /// Headcount of a record, if present and the column is usable.
    pub fn headcount_of(&self, record: &Record) -> Option<f64> {
        if self.headcount_usable {
            record.headcount.map(|h| h as f64)
        } else {
            None
        }
    }

    /// All usable weights in record order.
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(|r| self.weight_of(r))
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records with a valid timestamp, oldest first. Ties keep id order.
    pub fn chronological(&self) -> Vec<&Record> {
        let mut dated: Vec<&Record> = self.records.iter().filter(|r| r.has_timestamp()).collect();
        dated.sort_by_key(|r| (r.timestamp, r.id));
        dated
    }

    /// SHA-256 over the serialized records.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        format!("sha256:{:x}", hasher.finalize())
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
