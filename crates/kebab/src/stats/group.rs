//! Grouping keys derived from records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::normalize::{Record, RecordSet};

/// Which derived attribute to group records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Preparer,
    Weekday,
    Hour,
}

impl GroupBy {
    pub const ALL: [GroupBy; 3] = [GroupBy::Preparer, GroupBy::Weekday, GroupBy::Hour];

    /// The group a record falls into, or `None` if the attribute is missing
    /// (no preparer, invalid timestamp).
    pub fn key(&self, record: &Record) -> Option<GroupKey> {
        match self {
            GroupBy::Preparer => {
                if record.preparer_key.is_empty() {
                    None
                } else {
                    Some(GroupKey::Preparer(record.preparer_key.clone()))
                }
            }
            GroupBy::Weekday => {
                let weekday = record.weekday?;
                let label = record.weekday_label.clone()?;
                Some(GroupKey::Weekday(weekday.num_days_from_monday() as u8, label))
            }
            GroupBy::Hour => record.hour_int.map(GroupKey::Hour),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroupBy::Preparer => "preparer",
            GroupBy::Weekday => "weekday",
            GroupBy::Hour => "hour",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preparer" => Ok(GroupBy::Preparer),
            "weekday" | "day" => Ok(GroupBy::Weekday),
            "hour" => Ok(GroupBy::Hour),
            other => Err(format!(
                "unknown grouping '{}' (expected preparer, weekday or hour)",
                other
            )),
        }
    }
}

/// A group identity. The derived ordering is the display ordering:
/// weekdays Monday first, preparers lexicographic, hours numeric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Preparer(String),
    /// Days since Monday and the configured label.
    Weekday(u8, String),
    Hour(u32),
}

impl GroupKey {
    pub fn label(&self) -> String {
        match self {
            GroupKey::Preparer(key) => key.clone(),
            GroupKey::Weekday(_, label) => label.clone(),
            GroupKey::Hour(hour) => format!("{:02}:00", hour),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Usable weights per group, in key order. Groups without any usable weight
/// do not appear.
pub fn group_weights(records: &RecordSet, by: GroupBy) -> BTreeMap<GroupKey, Vec<f64>> {
    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for record in records {
        let (Some(key), Some(weight)) = (by.key(record), records.weight_of(record)) else {
            continue;
        };
        groups.entry(key).or_default().push(weight);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_order_is_not_lexicographic() {
        let mut keys = vec![
            GroupKey::Weekday(6, "So".into()),
            GroupKey::Weekday(0, "Mo".into()),
            GroupKey::Weekday(2, "Mi".into()),
            GroupKey::Weekday(1, "Di".into()),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(GroupKey::label).collect();
        assert_eq!(labels, vec!["Mo", "Di", "Mi", "So"]);
    }

    #[test]
    fn test_hour_label() {
        assert_eq!(GroupKey::Hour(9).label(), "09:00");
        assert!(GroupKey::Hour(9) < GroupKey::Hour(10));
    }

    #[test]
    fn test_parse_group_by() {
        assert_eq!("Weekday".parse::<GroupBy>(), Ok(GroupBy::Weekday));
        assert_eq!("hour".parse::<GroupBy>(), Ok(GroupBy::Hour));
        assert!("month".parse::<GroupBy>().is_err());
    }
}
