//! Hypothesis-test commands: compare, anova, schedule.

use std::path::PathBuf;

use colored::Colorize;
use kebab::stats::{
    AnovaOutcome, Comparison, GroupBy, GroupSummary, IndependenceTest, TestOutcome,
};

use super::{CommandResult, fmt_opt, fmt_p, open_ledger};
use crate::cli::Grouping;

pub fn compare(
    data: PathBuf,
    config: Option<PathBuf>,
    a: String,
    b: String,
    json: bool,
) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;
    let comparison = ledger.compare(&a, &b)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    match comparison {
        Comparison::SameGroup => {
            println!("{}", "Pick two different preparers.".yellow());
        }
        Comparison::InsufficientData { a, b } => {
            println!(
                "{} each preparer needs at least two weighed observations",
                "Not enough data:".yellow().bold()
            );
            print_group(&a);
            print_group(&b);
        }
        Comparison::Tested(test) => {
            println!("{}", "Welch t-test".cyan().bold());
            print_group(&test.a);
            print_group(&test.b);
            println!(
                "t = {:.3}, df = {:.1}, p = {}",
                test.t,
                test.df,
                fmt_p(test.p_value)
            );
            if test.significant {
                println!(
                    "{} {} makes heavier kebabs.",
                    "Significant:".green().bold(),
                    test.heavier
                );
            } else {
                println!(
                    "{} the difference could be chance.",
                    "Not significant:".dimmed()
                );
            }
        }
    }
    Ok(())
}

pub fn anova(
    data: PathBuf,
    config: Option<PathBuf>,
    by: Option<Grouping>,
    json: bool,
) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;

    let groupings: Vec<GroupBy> = match by {
        Some(g) => vec![g.into()],
        None => GroupBy::ALL.to_vec(),
    };
    let outcomes = groupings
        .into_iter()
        .map(|by| ledger.anova(by))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    for outcome in &outcomes {
        match outcome {
            AnovaOutcome::InsufficientData { by, .. } => {
                println!(
                    "{} {}: {}",
                    "ANOVA by".cyan().bold(),
                    by,
                    "not enough data".yellow()
                );
            }
            AnovaOutcome::Tested(test) => {
                let verdict = if test.significant {
                    "significant".green().bold()
                } else {
                    "not significant".dimmed()
                };
                println!(
                    "{} {}: F({}, {}) = {:.3}, p = {} ({})",
                    "ANOVA by".cyan().bold(),
                    test.by,
                    test.df_between,
                    test.df_within,
                    test.f,
                    fmt_p(test.p_value),
                    verdict
                );
            }
        }
        for group in outcome.groups() {
            print_group(group);
        }
        println!();
    }
    Ok(())
}

pub fn schedule(data: PathBuf, config: Option<PathBuf>, json: bool) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;
    let result = ledger.schedule()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_probabilities(&result);
    println!();

    match &result.test {
        TestOutcome::InsufficientData => {
            println!(
                "{} need at least two weekdays and two preparers",
                "Not enough data:".yellow().bold()
            );
        }
        TestOutcome::Tested(test) => {
            println!(
                "{} chi2 = {:.3}, dof = {}, p = {}{}",
                "Chi-square:".cyan().bold(),
                test.chi2,
                test.dof,
                fmt_p(test.p_value),
                if test.corrected { " (Yates)" } else { "" }
            );
            if test.significant {
                println!(
                    "{} who prepares depends on the weekday.",
                    "Significant:".green().bold()
                );
            } else {
                println!("{} no weekday pattern.", "Not significant:".dimmed());
            }
        }
    }
    Ok(())
}

fn print_probabilities(result: &IndependenceTest) {
    let table = &result.probabilities;
    if table.rows.is_empty() {
        println!("{}", "No dated observations.".dimmed());
        return;
    }

    let mut header = format!("{:<4}", "");
    for column in &table.columns {
        header.push_str(&format!(" {:>7}", column));
    }
    println!("{}", header.bold());

    for (row, shares) in &table.rows {
        let mut line = format!("{:<4}", row);
        for share in shares {
            line.push_str(&format!(" {:>6.1}%", share));
        }
        println!("{}", line);
    }
}

fn print_group(group: &GroupSummary) {
    println!(
        "  {:<8} n = {:<3} mean = {} g  std = {} g",
        group.label,
        group.count,
        fmt_opt(group.mean),
        fmt_opt(group.std())
    );
}
