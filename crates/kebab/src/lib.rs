//! Kebab: an observation ledger with a normalizer and a small statistics engine.
//!
//! Observations (a weight, a date and time, who prepared it, how many people
//! ate) are kept as loosely typed text rows in a row store. Every read runs
//! them through the [`Normalizer`], which turns them into typed [`Record`]s
//! and reports what it could not use as [`NormalizationIssue`] values instead
//! of failing. The [`stats`] module works on the normalized records.
//!
//! # Core Principles
//!
//! - **Non-destructive reads**: the store holds text, everything typed is derived
//! - **No aborts on bad data**: parsing and statistical edge cases are outcomes
//! - **Configuration over code**: formats, labels and aliases come from [`LedgerConfig`]
//!
//! # Example
//!
//! ```no_run
//! use kebab::{CsvStore, Ledger, LedgerConfig, stats::GroupBy};
//!
//! let config = LedgerConfig::default();
//! let store = CsvStore::open("kebabs.csv", &config.columns);
//! let mut ledger = Ledger::new(store, config).unwrap();
//!
//! let snapshot = ledger.snapshot().unwrap();
//! println!("Records: {}", snapshot.records().len());
//! println!("{:?}", ledger.anova(GroupBy::Preparer).unwrap());
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod input;
pub mod normalize;
pub mod stats;
pub mod store;

mod ledger;

pub use cache::SnapshotCache;
pub use config::{ColumnNames, LedgerConfig, NormalizerConfig, StatsConfig};
pub use error::{KebabError, Result};
pub use input::{RawRow, RawTable, SourceMetadata};
pub use ledger::{Ledger, Snapshot};
pub use normalize::{
    Normalization, NormalizationIssue, Normalizer, Record, RecordSet, TimestampFormat,
};
pub use store::{CsvStore, Entry, MemoryStore, RowStore, WriteOutcome, next_id};
