//! Trend command - weight over time.

use std::path::PathBuf;

use colored::Colorize;
use kebab::stats::{correlation_matrix, cumulative_weight, histogram, moving_average};
use serde_json::json;

use super::{CommandResult, fmt_opt, open_ledger};

pub fn run(
    data: PathBuf,
    config: Option<PathBuf>,
    window: usize,
    bins: usize,
    json_output: bool,
) -> CommandResult {
    if window == 0 {
        return Err("window must be at least 1".into());
    }

    let mut ledger = open_ledger(&data, config.as_ref())?;
    let snapshot = ledger.snapshot()?;
    let records = snapshot.records();

    let trend = moving_average(records, window);
    let cumulative = cumulative_weight(records);
    let bins = histogram(records, bins);
    let correlation = correlation_matrix(records);

    if json_output {
        let output = json!({
            "window": window,
            "moving_average": trend,
            "cumulative": cumulative,
            "histogram": bins,
            "correlation": correlation,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if trend.is_empty() {
        println!("{}", "No dated observations with a weight.".dimmed());
        return Ok(());
    }

    println!("{}", format!("Moving average (window {})", window).cyan().bold());
    for (point, total) in trend.iter().zip(&cumulative) {
        println!(
            "  {}  {:>5} g  avg {:>7}  total {:>6.2} kg",
            point.timestamp.format("%Y-%m-%d %H:%M"),
            point.weight_g,
            fmt_opt(point.average),
            total.total_kg
        );
    }

    println!();
    println!("{}", "Weight distribution".cyan().bold());
    let widest = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &bins {
        let bar = "#".repeat((bin.count * 40).div_ceil(widest));
        println!("  {:>6.1}-{:<6.1} {:>4} {}", bin.lower, bin.upper, bin.count, bar);
    }

    println!();
    println!(
        "{} (n = {})",
        "Correlation".cyan().bold(),
        correlation.observations
    );
    print!("  {:<10}", "");
    for name in &correlation.variables {
        print!(" {:>10}", name);
    }
    println!();
    for (name, row) in correlation.variables.iter().zip(&correlation.values) {
        print!("  {:<10}", name);
        for value in row {
            print!(" {:>10}", value.map_or("-".to_string(), |v| format!("{:.2}", v)));
        }
        println!();
    }

    Ok(())
}
