//! Pipeline performance benchmarks.
//!
//! Measures parsing, normalization and the statistics on ledgers of
//! different sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kebab::input::Parser;
use kebab::stats::{GroupBy, correlation_matrix, group_anova, independence_test, pairwise_compare};
use kebab::{ColumnNames, NormalizerConfig, Normalizer, RecordSet, StatsConfig};
use std::io::Write;
use tempfile::NamedTempFile;

const PREPARERS: [&str; 6] = ["OG1", "og", "OG2", "Chef", "m", "IDIOT"];

/// Generate a synthetic ledger in the deployment format.
fn generate_ledger(rows: usize) -> String {
    let mut data = String::from("id,datum,gewicht_g,zubereitet,personen,uhrzeit\n");

    for row in 0..rows {
        let day = (row % 28) + 1;
        let month = (row / 28 % 12) + 1;
        let weight = 350 + (row * 37) % 250;
        let preparer = PREPARERS[row % PREPARERS.len()];
        let people = 1 + row % 6;
        let hour = 11 + row % 12;
        let minute = (row * 7) % 60;

        data.push_str(&format!(
            "{},{:02}.{:02}.2025,{},{},{},{:02}:{:02}:00\n",
            row + 1,
            day,
            month,
            weight,
            preparer,
            people,
            hour,
            minute
        ));
    }

    data
}

fn normalized(rows: usize) -> RecordSet {
    let parser = Parser::new();
    let table = parser
        .parse_bytes(generate_ledger(rows).as_bytes(), b',')
        .unwrap();
    Normalizer::new(ColumnNames::default(), NormalizerConfig::default())
        .normalize_table(&table)
        .records
}

/// Benchmark reading ledger files from disk.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_ledger(*rows);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let parser = Parser::new();
                    black_box(parser.parse_file(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

/// Benchmark normalization of parsed tables.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let normalizer = Normalizer::new(ColumnNames::default(), NormalizerConfig::default());

    for rows in [100, 1_000, 10_000].iter() {
        let table = Parser::new()
            .parse_bytes(generate_ledger(*rows).as_bytes(), b',')
            .unwrap();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(normalizer.normalize_table(table)))
        });
    }

    group.finish();
}

/// Benchmark the hypothesis tests on a normalized ledger.
fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");
    let config = StatsConfig::default();
    let records = normalized(5_000);

    group.bench_function("pairwise_compare", |b| {
        b.iter(|| black_box(pairwise_compare(&records, "OG1", "CHEF", &config)))
    });

    for by in GroupBy::ALL {
        group.bench_with_input(BenchmarkId::new("group_anova", by), &by, |b, &by| {
            b.iter(|| black_box(group_anova(&records, by, &config)))
        });
    }

    group.bench_function("independence_test", |b| {
        b.iter(|| {
            black_box(independence_test(
                &records,
                GroupBy::Weekday,
                GroupBy::Preparer,
                &config.excluded_labels,
                &config,
            ))
        })
    });

    group.bench_function("correlation_matrix", |b| {
        b.iter(|| black_box(correlation_matrix(&records)))
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_normalize, bench_stats);
criterion_main!(benches);
