//! One-way analysis of variance on weights.

use serde::{Deserialize, Serialize};

use super::descriptive::{GroupSummary, mean};
use super::distribution::f_upper_tail;
use super::group::{GroupBy, group_weights};
use crate::config::StatsConfig;
use crate::normalize::RecordSet;

/// F-test across the groups of one grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTest {
    pub by: GroupBy,
    pub f: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub p_value: f64,
    pub significant: bool,
    /// Groups in key order.
    pub groups: Vec<GroupSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnovaOutcome {
    /// Fewer than two groups with weights, or no within-group spread to
    /// estimate from (every group a singleton).
    InsufficientData {
        by: GroupBy,
        groups: Vec<GroupSummary>,
    },
    Tested(AnovaTest),
}

impl AnovaOutcome {
    pub fn groups(&self) -> &[GroupSummary] {
        match self {
            AnovaOutcome::InsufficientData { groups, .. } => groups,
            AnovaOutcome::Tested(test) => &test.groups,
        }
    }
}

/// One-way between-groups F-test on weights.
///
/// Groups without usable weights are dropped. Singleton groups stay in: they
/// add to the between-group sum of squares and contribute nothing to the
/// within-group estimate.
pub fn group_anova(records: &RecordSet, by: GroupBy, config: &StatsConfig) -> AnovaOutcome {
    let grouped = group_weights(records, by);
    let groups: Vec<GroupSummary> = grouped
        .iter()
        .map(|(key, values)| GroupSummary::from_values(key.label(), values))
        .collect();

    let k = grouped.len();
    let n: usize = grouped.values().map(Vec::len).sum();
    if k < 2 || n <= k {
        return AnovaOutcome::InsufficientData { by, groups };
    }

    let all: Vec<f64> = grouped.values().flatten().copied().collect();
    let Some(grand_mean) = mean(&all) else {
        return AnovaOutcome::InsufficientData { by, groups };
    };

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for values in grouped.values() {
        let Some(group_mean) = mean(values) else {
            continue;
        };
        ss_between += values.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += values.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = n - k;

    let (f, p_value) = if ss_within == 0.0 {
        if ss_between > 0.0 {
            (f64::INFINITY, 0.0)
        } else {
            (f64::NAN, 1.0)
        }
    } else {
        let f = (ss_between / df_between as f64) / (ss_within / df_within as f64);
        (f, f_upper_tail(f, df_between as f64, df_within as f64))
    };

    AnovaOutcome::Tested(AnovaTest {
        by,
        f,
        df_between,
        df_within,
        p_value,
        significant: p_value < config.significance,
        groups,
    })
}
