//! Summary command - numbers and facts.

use std::path::PathBuf;

use colored::Colorize;
use kebab::stats::GroupMean;

use super::{CommandResult, fmt_opt, open_ledger, print_issues};

pub fn run(data: PathBuf, config: Option<PathBuf>, json: bool) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;
    let summary = ledger.summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_issues(&*ledger.snapshot()?);

    println!("{} {}", "Observations:".cyan().bold(), summary.total);

    match &summary.distribution {
        Some(d) => {
            println!(
                "Weight: mean {} g, median {} g, std {} g, range {}-{} g (n = {})",
                fmt_opt(Some(d.mean)),
                fmt_opt(Some(d.median)),
                fmt_opt(d.std),
                d.min,
                d.max,
                d.count
            );
        }
        None => println!("{}", "No usable weights.".dimmed()),
    }

    print_ranking("By preparer", &summary.by_preparer);
    print_ranking("By weekday", &summary.by_weekday);
    print_ranking("By hour", &summary.by_hour);
    Ok(())
}

fn print_ranking(title: &str, ranking: &[GroupMean]) {
    if ranking.is_empty() {
        return;
    }
    println!();
    println!("{}", title.yellow().bold());
    for (i, line) in ranking.iter().enumerate() {
        let label = format!("{:<8}", line.label);
        let label = if i == 0 {
            label.green().bold()
        } else {
            label.normal()
        };
        println!("  {} {:>7.1} g  (n = {})", label, line.mean, line.count);
    }
}
