//! Fuzz target for row normalization and the statistics built on it.
//!
//! Arbitrary cell text goes through the normalizer and every hypothesis
//! test. None of them may panic, and every probability row must sum to 100.

#![no_main]

use arbitrary::Arbitrary;
use kebab::stats::{GroupBy, group_anova, independence_test, pairwise_compare};
use kebab::{ColumnNames, NormalizerConfig, Normalizer, RawRow, StatsConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzRow {
    id: Option<String>,
    date: Option<String>,
    weight: Option<String>,
    preparer: Option<String>,
    headcount: Option<String>,
    time: Option<String>,
}

fuzz_target!(|rows: Vec<FuzzRow>| {
    if rows.len() > 500 {
        return;
    }

    let rows: Vec<RawRow> = rows
        .into_iter()
        .map(|r| RawRow {
            id: r.id,
            date: r.date,
            weight: r.weight,
            preparer: r.preparer,
            headcount: r.headcount,
            time: r.time,
        })
        .collect();

    let columns = ColumnNames::default();
    let header = columns.ordered();
    let normalizer = Normalizer::new(columns.clone(), NormalizerConfig::default());
    let records = normalizer.normalize(&rows, &header[..]).records;

    let config = StatsConfig::default();
    let _ = pairwise_compare(&records, "OG1", "CHEF", &config);
    for by in GroupBy::ALL {
        let _ = group_anova(&records, by, &config);
    }

    let result = independence_test(
        &records,
        GroupBy::Weekday,
        GroupBy::Preparer,
        &config.excluded_labels,
        &config,
    );
    for shares in result.probabilities.rows.values() {
        let total: f64 = shares.iter().sum();
        assert!((total - 100.0).abs() < 1e-6);
    }
});
