//! The write side: one observation as entered by a user.

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ColumnNames;
use crate::error::{KebabError, Result};
use crate::normalize::TimestampFormat;

/// Largest weight an entry may carry, in grams.
pub const MAX_WEIGHT_G: u32 = 1000;

/// Largest headcount an entry may carry.
pub const MAX_HEADCOUNT: u32 = 50;

/// A new or edited observation. Writes store validated primitives only; the
/// normalizer re-derives everything else on the next read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub weight_g: u32,
    pub preparer: String,
    pub headcount: u32,
}

impl Entry {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        weight_g: u32,
        preparer: impl Into<String>,
        headcount: u32,
    ) -> Self {
        Self {
            date,
            time,
            weight_g,
            preparer: preparer.into(),
            headcount,
        }
    }

    /// Check the bounds the entry form enforces.
    pub fn validate(&self) -> Result<()> {
        if self.weight_g > MAX_WEIGHT_G {
            return Err(KebabError::Validation(format!(
                "weight must be between 0 and {} g, got {}",
                MAX_WEIGHT_G, self.weight_g
            )));
        }
        if self.headcount > MAX_HEADCOUNT {
            return Err(KebabError::Validation(format!(
                "headcount must be between 0 and {}, got {}",
                MAX_HEADCOUNT, self.headcount
            )));
        }
        if self.preparer.trim().is_empty() {
            return Err(KebabError::Validation(
                "preparer must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Preparer label as written to the store.
    pub fn stored_preparer(&self) -> String {
        self.preparer.trim().to_uppercase()
    }

    /// Cells for this entry keyed by column name, in store order.
    pub fn to_fields(
        &self,
        id: u64,
        columns: &ColumnNames,
        format: &TimestampFormat,
    ) -> IndexMap<String, String> {
        let mut fields = IndexMap::new();
        fields.insert(columns.id.clone(), id.to_string());
        fields.insert(columns.date.clone(), format.format_date(self.date));
        fields.insert(columns.weight.clone(), self.weight_g.to_string());
        fields.insert(columns.preparer.clone(), self.stored_preparer());
        fields.insert(columns.headcount.clone(), self.headcount.to_string());
        fields.insert(columns.time.clone(), format.format_time(self.time));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            450,
            " og1 ",
            3,
        )
    }

    #[test]
    fn test_validate_bounds() {
        assert!(entry().validate().is_ok());

        let mut heavy = entry();
        heavy.weight_g = 1001;
        assert!(matches!(heavy.validate(), Err(KebabError::Validation(_))));

        let mut crowded = entry();
        crowded.headcount = 51;
        assert!(crowded.validate().is_err());

        let mut anonymous = entry();
        anonymous.preparer = "  ".into();
        assert!(anonymous.validate().is_err());

        let mut edge = entry();
        edge.weight_g = 1000;
        edge.headcount = 50;
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_to_fields_uses_store_formats() {
        let fields = entry().to_fields(7, &ColumnNames::default(), &TimestampFormat::default());
        let values: Vec<&str> = fields.values().map(String::as_str).collect();
        assert_eq!(values, vec!["7", "15.03.2025", "450", "OG1", "3", "14:30:00"]);
        assert_eq!(fields.get("gewicht_g").map(String::as_str), Some("450"));
    }

    #[test]
    fn test_to_fields_iso() {
        let fields = entry().to_fields(1, &ColumnNames::default(), &TimestampFormat::iso());
        assert_eq!(fields.get("datum").map(String::as_str), Some("2025-03-15"));
    }
}
