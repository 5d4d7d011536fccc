//! Descriptive statistics: means, spreads, group rankings and histograms.

use serde::{Deserialize, Serialize};

use super::group::{GroupBy, group_weights};
use crate::normalize::RecordSet;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Unbiased sample variance (`n - 1` denominator), `None` below two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Median of the values, `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Count and mean of one group of weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub variance: Option<f64>,
}

impl GroupSummary {
    pub fn from_values(label: impl Into<String>, values: &[f64]) -> Self {
        Self {
            label: label.into(),
            count: values.len(),
            mean: mean(values),
            variance: sample_variance(values),
        }
    }

    pub fn std(&self) -> Option<f64> {
        self.variance.map(f64::sqrt)
    }
}

/// Shape of the weight distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` below two observations.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl Distribution {
    /// Describe a set of values, `None` when there are none.
    pub fn describe(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let median = median(values)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: values.len(),
            mean,
            std: sample_variance(values).map(f64::sqrt),
            min,
            max,
            median,
        })
    }
}

/// One line of a group ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub label: String,
    /// Mean weight rounded to 0.1 g.
    pub mean: f64,
    pub count: usize,
}

/// The "numbers and facts" overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of records, including those without a usable weight.
    pub total: usize,
    pub distribution: Option<Distribution>,
    pub by_preparer: Vec<GroupMean>,
    pub by_weekday: Vec<GroupMean>,
    pub by_hour: Vec<GroupMean>,
}

/// Build the overview for a record set.
pub fn summary(records: &RecordSet) -> Summary {
    let weights: Vec<f64> = records.weights().collect();

    Summary {
        total: records.len(),
        distribution: Distribution::describe(&weights),
        by_preparer: ranking(records, GroupBy::Preparer),
        by_weekday: ranking(records, GroupBy::Weekday),
        by_hour: ranking(records, GroupBy::Hour),
    }
}

/// Group means sorted heaviest first. Equal means keep key order.
pub fn ranking(records: &RecordSet, by: GroupBy) -> Vec<GroupMean> {
    let mut means: Vec<GroupMean> = group_weights(records, by)
        .into_iter()
        .filter_map(|(key, values)| {
            mean(&values).map(|m| GroupMean {
                label: key.label(),
                mean: (m * 10.0).round() / 10.0,
                count: values.len(),
            })
        })
        .collect();

    means.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    means
}

/// One histogram bin. `upper` is exclusive except for the last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of usable weights.
pub fn histogram(records: &RecordSet, bins: usize) -> Vec<Bin> {
    let values: Vec<f64> = records.weights().collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut result: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for value in values {
        let index = (((value - lo) / width) as usize).min(bins - 1);
        result[index].count += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Record;

    fn record(id: u64, weight: i64, preparer: &str, hour: u32) -> Record {
        Record {
            id,
            timestamp: None,
            weight_g: Some(weight),
            headcount: None,
            preparer_raw: preparer.to_string(),
            preparer_key: preparer.to_string(),
            weekday: None,
            weekday_label: None,
            hour_of_day: Some(hour as f64),
            hour_int: Some(hour),
        }
    }

    #[test]
    fn test_sample_variance_uses_n_minus_one() {
        assert_eq!(sample_variance(&[400.0, 410.0, 420.0]), Some(100.0));
        assert_eq!(sample_variance(&[400.0]), None);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_ranking_sorted_heaviest_first() {
        let set = RecordSet::from_records(vec![
            record(1, 400, "OG1", 12),
            record(2, 500, "CHEF", 13),
            record(3, 420, "OG1", 12),
        ]);
        let ranked = ranking(&set, GroupBy::Preparer);
        assert_eq!(ranked[0].label, "CHEF");
        assert_eq!(ranked[1].mean, 410.0);
        assert_eq!(ranked[1].count, 2);

        let hours = ranking(&set, GroupBy::Hour);
        assert_eq!(hours[0].label, "13:00");
    }

    #[test]
    fn test_summary_counts_all_records() {
        let mut no_weight = record(4, 0, "OG1", 12);
        no_weight.weight_g = None;
        let set = RecordSet::from_records(vec![record(1, 400, "OG1", 12), no_weight]);

        let s = summary(&set);
        assert_eq!(s.total, 2);
        assert_eq!(s.distribution.unwrap().count, 1);
        assert!(s.by_weekday.is_empty());
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let set = RecordSet::from_records(
            (0..30).map(|i| record(i + 1, 400 + i as i64, "OG1", 12)).collect(),
        );
        let bins = histogram(&set, 15);
        assert_eq!(bins.len(), 15);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 30);
        assert_eq!(bins[0].lower, 400.0);
        assert!((bins[14].upper - 429.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_single_value() {
        let set = RecordSet::from_records(vec![record(1, 450, "OG1", 12)]);
        let bins = histogram(&set, 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 1);
    }
}
