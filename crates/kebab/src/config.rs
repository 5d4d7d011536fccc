//! Deployment configuration for the ledger.
//!
//! Everything that differs between deployments (column names, the timestamp
//! format, weekday labels, preparer aliases, the significance threshold and
//! the sentinel labels) lives here and is handed to the normalizer and the
//! stats engine at call time.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{KebabError, Result};
use crate::normalize::TimestampFormat;

/// Default weekday labels, Monday first.
pub const DEFAULT_WEEKDAY_LABELS: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

/// Canonical preparer labels offered even before they appear in the data.
pub const DEFAULT_KNOWN_PREPARERS: [&str; 5] = ["OG1", "OG2", "CHEF", "IDIOT", "ANDERE"];

/// Sentinel label for test entries that never count as production work.
pub const DEFAULT_SENTINEL_LABEL: &str = "IDIOT";

/// Names of the store columns, as they appear in the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub id: String,
    pub date: String,
    pub weight: String,
    pub preparer: String,
    pub headcount: String,
    pub time: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            date: "datum".to_string(),
            weight: "gewicht_g".to_string(),
            preparer: "zubereitet".to_string(),
            headcount: "personen".to_string(),
            time: "uhrzeit".to_string(),
        }
    }
}

impl ColumnNames {
    /// Column names in store order.
    pub fn ordered(&self) -> [&str; 6] {
        [
            &self.id,
            &self.date,
            &self.weight,
            &self.preparer,
            &self.headcount,
            &self.time,
        ]
    }
}

/// Normalizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// The single date/time format of this deployment.
    pub timestamp: TimestampFormat,
    /// Weekday labels, Monday first.
    pub weekday_labels: [String; 7],
    /// Preparer aliases applied after upper-casing and whitespace removal.
    pub aliases: IndexMap<String, String>,
    /// Seed list for the known-preparer registry.
    pub known_preparers: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        let mut aliases = IndexMap::new();
        aliases.insert("OG".to_string(), "OG1".to_string());
        aliases.insert("M".to_string(), "CHEF".to_string());

        Self {
            timestamp: TimestampFormat::default(),
            weekday_labels: DEFAULT_WEEKDAY_LABELS.map(String::from),
            aliases,
            known_preparers: DEFAULT_KNOWN_PREPARERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl NormalizerConfig {
    /// Replace the alias table.
    pub fn with_aliases<K, V>(mut self, aliases: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases = aliases
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Set the timestamp format.
    pub fn with_timestamp(mut self, timestamp: TimestampFormat) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Stats engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// p-values below this are labelled significant.
    pub significance: f64,
    /// Preparer labels left out of the independence test.
    pub excluded_labels: Vec<String>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            significance: 0.05,
            excluded_labels: vec![DEFAULT_SENTINEL_LABEL.to_string()],
        }
    }
}

impl StatsConfig {
    /// Set the significance threshold.
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub columns: ColumnNames,
    pub normalizer: NormalizerConfig,
    pub stats: StatsConfig,
    /// Secondary expiry of the cached snapshot, in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            normalizer: NormalizerConfig::default(),
            stats: StatsConfig::default(),
            cache_ttl_secs: 600,
        }
    }
}

impl LedgerConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| KebabError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: LedgerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Cache time-to-live as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Check the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let significance = self.stats.significance;
        if !(significance > 0.0 && significance < 1.0) {
            return Err(KebabError::Config(format!(
                "significance must be between 0 and 1, got {}",
                significance
            )));
        }

        if let Some(label) = self
            .normalizer
            .weekday_labels
            .iter()
            .find(|l| l.trim().is_empty())
        {
            return Err(KebabError::Config(format!(
                "weekday labels must not be blank (got {:?})",
                label
            )));
        }

        if let Some((from, _)) = self
            .normalizer
            .aliases
            .iter()
            .find(|(_, to)| to.trim().is_empty())
        {
            return Err(KebabError::Config(format!(
                "alias '{}' maps to an empty label",
                from
            )));
        }

        if self.columns.id.trim().is_empty() {
            return Err(KebabError::Config("id column name is empty".to_string()));
        }

        Ok(())
    }
}
