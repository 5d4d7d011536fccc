//! Time-ordered trends and correlations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::descriptive::mean;
use crate::normalize::{Record, RecordSet};

/// Default trailing window for [`moving_average`].
pub const DEFAULT_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub id: u64,
    pub timestamp: NaiveDateTime,
    pub weight_g: f64,
    /// Trailing mean, `None` until the window has filled.
    pub average: Option<f64>,
}

/// Time-sorted weights with a trailing mean over `window` points. Records
/// without a timestamp or weight are skipped.
pub fn moving_average(records: &RecordSet, window: usize) -> Vec<TrendPoint> {
    let points = dated_weights(records);
    let weights: Vec<f64> = points.iter().map(|(_, w)| *w).collect();

    points
        .iter()
        .enumerate()
        .filter_map(|(i, (record, weight))| {
            let timestamp = record.timestamp?;
            let average = if window > 0 && i + 1 >= window {
                mean(&weights[i + 1 - window..=i])
            } else {
                None
            };
            Some(TrendPoint {
                id: record.id,
                timestamp,
                weight_g: *weight,
                average,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub timestamp: NaiveDateTime,
    pub total_kg: f64,
}

/// Running total of weights in kilograms, in time order.
pub fn cumulative_weight(records: &RecordSet) -> Vec<CumulativePoint> {
    let mut total = 0.0;
    dated_weights(records)
        .into_iter()
        .filter_map(|(record, weight)| {
            total += weight / 1000.0;
            record.timestamp.map(|timestamp| CumulativePoint {
                timestamp,
                total_kg: total,
            })
        })
        .collect()
}

fn dated_weights(records: &RecordSet) -> Vec<(&Record, f64)> {
    records
        .chronological()
        .into_iter()
        .filter_map(|r| records.weight_of(r).map(|w| (r, w)))
        .collect()
}

/// Pairwise Pearson correlations between weight, headcount and hour of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub variables: [String; 3],
    /// Symmetric; `None` where a variable has no spread.
    pub values: [[Option<f64>; 3]; 3],
    /// Rows with all three variables present.
    pub observations: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.variables.iter().position(|v| v == a)?;
        let j = self.variables.iter().position(|v| v == b)?;
        self.values[i][j]
    }
}

pub fn correlation_matrix(records: &RecordSet) -> CorrelationMatrix {
    let rows: Vec<[f64; 3]> = records
        .iter()
        .filter_map(|r| {
            Some([
                records.weight_of(r)?,
                records.headcount_of(r)?,
                r.hour_of_day?,
            ])
        })
        .collect();

    let column = |k: usize| -> Vec<f64> { rows.iter().map(|row| row[k]).collect() };
    let columns = [column(0), column(1), column(2)];

    let mut values = [[None; 3]; 3];
    for i in 0..3 {
        for j in i..3 {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        variables: [
            "weight_g".to_string(),
            "headcount".to_string(),
            "hour".to_string(),
        ],
        values,
        observations: rows.len(),
    }
}

/// Pearson correlation coefficient, `None` below two points or without spread.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}
