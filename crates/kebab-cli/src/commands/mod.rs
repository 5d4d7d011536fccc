//! CLI command implementations.

pub mod entry;
pub mod list;
pub mod stats;
pub mod summary;
pub mod trend;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use colored::Colorize;
use kebab::{CsvStore, Ledger, LedgerConfig, NormalizationIssue, Snapshot};
use tracing::debug;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the ledger for a data file, with an optional configuration file.
pub fn open_ledger(
    data: &Path,
    config: Option<&PathBuf>,
) -> Result<Ledger<CsvStore>, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => LedgerConfig::load(path)?,
        None => LedgerConfig::default(),
    };
    debug!(data = %data.display(), "Opening ledger");

    let store = CsvStore::open(data, &config.columns);
    Ok(Ledger::new(store, config)?)
}

pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", text, e))
}

pub fn parse_time(text: &str) -> Result<NaiveTime, String> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|e| format!("invalid time '{}' (expected HH:MM[:SS]): {}", text, e))
}

/// Print column-level normalization issues as notices on stderr.
pub fn print_issues(snapshot: &Snapshot) {
    let normalization = &snapshot.normalization;

    for issue in normalization.column_issues() {
        let label = match issue {
            NormalizationIssue::MissingIdColumn { .. } => "error".red().bold(),
            _ => "note".yellow().bold(),
        };
        eprintln!("{}: {}", label, issue);
    }

    let failures = normalization.timestamp_failures();
    if failures > 0 {
        eprintln!(
            "{}: {} row(s) with an unreadable date/time are left out of time-based views",
            "note".yellow().bold(),
            failures
        );
    }
}

/// Format an optional number with one decimal.
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

/// Format a p-value with four decimals.
pub fn fmt_p(p: f64) -> String {
    if p < 0.0001 {
        "< 0.0001".to_string()
    } else {
        format!("{:.4}", p)
    }
}
