//! Two-preparer comparison with Welch's t-test.

use serde::{Deserialize, Serialize};

use super::descriptive::GroupSummary;
use super::distribution::students_t_two_tailed;
use crate::config::StatsConfig;
use crate::normalize::RecordSet;

/// Result of a Welch test between two groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    pub a: GroupSummary,
    pub b: GroupSummary,
    pub t: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub df: f64,
    /// Two-tailed.
    pub p_value: f64,
    /// Label of the group with the higher mean.
    pub heavier: String,
    pub significant: bool,
}

/// Outcome of [`pairwise_compare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Comparison {
    /// Both keys name the same group.
    SameGroup,
    /// A group has fewer than two usable weights.
    InsufficientData { a: GroupSummary, b: GroupSummary },
    Tested(WelchTest),
}

/// Compare the weights of two preparers without assuming equal variances.
pub fn pairwise_compare(
    records: &RecordSet,
    key_a: &str,
    key_b: &str,
    config: &StatsConfig,
) -> Comparison {
    if key_a == key_b {
        return Comparison::SameGroup;
    }

    let weights_of = |key: &str| -> Vec<f64> {
        records
            .iter()
            .filter(|r| r.preparer_key == key)
            .filter_map(|r| records.weight_of(r))
            .collect()
    };
    let values_a = weights_of(key_a);
    let values_b = weights_of(key_b);

    let a = GroupSummary::from_values(key_a, &values_a);
    let b = GroupSummary::from_values(key_b, &values_b);

    let (Some(mean_a), Some(var_a), Some(mean_b), Some(var_b)) = (a.mean, a.variance, b.mean, b.variance)
    else {
        return Comparison::InsufficientData { a, b };
    };

    let (t, df, p_value) = welch(
        (mean_a, var_a, values_a.len() as f64),
        (mean_b, var_b, values_b.len() as f64),
    );

    let heavier = if mean_a > mean_b { key_a } else { key_b }.to_string();

    Comparison::Tested(WelchTest {
        a,
        b,
        t,
        df,
        p_value,
        heavier,
        significant: p_value < config.significance,
    })
}

/// Welch's t statistic, degrees of freedom and two-tailed p-value from
/// `(mean, sample variance, n)` of each group.
pub fn welch(a: (f64, f64, f64), b: (f64, f64, f64)) -> (f64, f64, f64) {
    let (mean_a, var_a, n_a) = a;
    let (mean_b, var_b, n_b) = b;

    let se_a = var_a / n_a;
    let se_b = var_b / n_b;
    let se2 = se_a + se_b;
    let diff = mean_a - mean_b;

    // Both groups constant: the difference is either nil or certain
    if se2 == 0.0 {
        let p = if diff == 0.0 { 1.0 } else { 0.0 };
        let t = if diff == 0.0 {
            0.0
        } else {
            f64::INFINITY.copysign(diff)
        };
        return (t, n_a + n_b - 2.0, p);
    }

    let t = diff / se2.sqrt();
    let df = se2.powi(2) / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));

    (t, df, students_t_two_tailed(t, df))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Record;

    fn record(id: u64, weight: Option<i64>, preparer: &str) -> Record {
        Record {
            id,
            timestamp: None,
            weight_g: weight,
            headcount: None,
            preparer_raw: preparer.to_string(),
            preparer_key: preparer.to_string(),
            weekday: None,
            weekday_label: None,
            hour_of_day: None,
            hour_int: None,
        }
    }

    fn records(groups: &[(&str, &[i64])]) -> RecordSet {
        let mut id = 0;
        let mut out = Vec::new();
        for (key, weights) in groups {
            for w in *weights {
                id += 1;
                out.push(record(id, Some(*w), key));
            }
        }
        RecordSet::from_records(out)
    }

    #[test]
    fn test_heavier_group_is_significant() {
        let set = records(&[("A", &[400, 410, 420]), ("B", &[450, 460, 470])]);
        let Comparison::Tested(test) = pairwise_compare(&set, "A", "B", &StatsConfig::default())
        else {
            panic!("expected a test result");
        };

        assert!(test.p_value < 0.05);
        assert!((test.p_value - 0.0036022).abs() < 1e-5);
        assert!((test.t + 6.1237244).abs() < 1e-6);
        assert!((test.df - 4.0).abs() < 1e-9);
        assert_eq!(test.heavier, "B");
        assert!(test.significant);
        assert_eq!(test.a.mean, Some(410.0));
    }

    #[test]
    fn test_overlapping_groups_not_significant() {
        let set = records(&[("A", &[400, 420, 410, 430, 405]), ("B", &[415, 425, 440, 410])]);
        let Comparison::Tested(test) = pairwise_compare(&set, "A", "B", &StatsConfig::default())
        else {
            panic!("expected a test result");
        };

        assert!((test.p_value - 0.306424).abs() < 1e-4);
        assert!(!test.significant);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let set = records(&[("A", &[400, 410, 420]), ("B", &[450, 460, 470])]);
        let strict = StatsConfig::default().with_significance(0.001);
        let Comparison::Tested(test) = pairwise_compare(&set, "A", "B", &strict) else {
            panic!("expected a test result");
        };
        assert!(!test.significant);
    }

    #[test]
    fn test_insufficient_data() {
        let set = records(&[("A", &[400]), ("B", &[450, 460, 470])]);
        assert!(matches!(
            pairwise_compare(&set, "A", "B", &StatsConfig::default()),
            Comparison::InsufficientData { .. }
        ));

        let set = records(&[("A", &[400, 410])]);
        assert!(matches!(
            pairwise_compare(&set, "A", "B", &StatsConfig::default()),
            Comparison::InsufficientData { .. }
        ));
    }

    #[test]
    fn test_missing_weights_do_not_count() {
        let mut set = records(&[("A", &[400]), ("B", &[450, 460])]).records().to_vec();
        set.push(record(10, None, "A"));
        let set = RecordSet::from_records(set);
        assert!(matches!(
            pairwise_compare(&set, "A", "B", &StatsConfig::default()),
            Comparison::InsufficientData { .. }
        ));
    }

    #[test]
    fn test_same_group() {
        let set = records(&[("A", &[400, 410])]);
        assert_eq!(
            pairwise_compare(&set, "A", "A", &StatsConfig::default()),
            Comparison::SameGroup
        );
    }

    #[test]
    fn test_constant_groups() {
        let (t, _, p) = welch((400.0, 0.0, 3.0), (450.0, 0.0, 3.0));
        assert_eq!(p, 0.0);
        assert!(t.is_infinite() && t < 0.0);

        let (_, _, p) = welch((400.0, 0.0, 3.0), (400.0, 0.0, 3.0));
        assert_eq!(p, 1.0);
    }
}
