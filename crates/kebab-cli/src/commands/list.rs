//! List and preparers commands.

use std::path::PathBuf;

use colored::Colorize;
use kebab::Record;

use super::{CommandResult, open_ledger, print_issues};

pub fn run(data: PathBuf, config: Option<PathBuf>, json: bool, limit: Option<usize>) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;
    let snapshot = ledger.snapshot()?;

    let mut records: Vec<&Record> = snapshot.records().iter().collect();
    records.sort_by(|a, b| b.id.cmp(&a.id));
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    print_issues(&snapshot);

    if records.is_empty() {
        println!("{}", "No observations yet.".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:>5}  {:<10}  {:<8}  {:<3}  {:>7}  {:<10}  {:>6}",
            "ID", "DATE", "TIME", "DAY", "WEIGHT", "PREPARER", "PEOPLE"
        )
        .bold()
    );

    for record in records {
        let (date, time) = match record.timestamp {
            Some(ts) => (
                ts.format("%Y-%m-%d").to_string(),
                ts.format("%H:%M").to_string(),
            ),
            None => ("?".to_string(), "?".to_string()),
        };
        let weight = record
            .weight_g
            .map_or_else(|| "-".to_string(), |w| format!("{} g", w));
        let people = record
            .headcount
            .map_or_else(|| "-".to_string(), |h| h.to_string());

        println!(
            "{:>5}  {:<10}  {:<8}  {:<3}  {:>7}  {:<10}  {:>6}",
            record.id,
            date,
            time,
            record.weekday_label.as_deref().unwrap_or("-"),
            weight,
            record.preparer_key,
            people
        );
    }

    Ok(())
}

pub fn preparers(data: PathBuf, config: Option<PathBuf>) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;
    let snapshot = ledger.snapshot()?;

    for key in &snapshot.known_preparers {
        let count = snapshot
            .records()
            .iter()
            .filter(|r| &r.preparer_key == key)
            .count();
        println!("{} {}", format!("{:<12}", key).cyan(), count.to_string().dimmed());
    }
    Ok(())
}
