//! Add, edit and delete commands.

use std::path::PathBuf;

use chrono::{Local, Timelike};
use colored::Colorize;
use kebab::{Entry, Record, WriteOutcome};

use super::{CommandResult, open_ledger, parse_date, parse_time};
use crate::cli::{EditArgs, EntryArgs};

pub fn add(data: PathBuf, config: Option<PathBuf>, args: EntryArgs) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;

    let now = Local::now().naive_local();
    let date = match &args.date {
        Some(text) => parse_date(text)?,
        None => now.date(),
    };
    let time = match &args.time {
        Some(text) => parse_time(text)?,
        None => now.time().with_nanosecond(0).unwrap_or(now.time()),
    };

    let entry = Entry::new(date, time, args.weight, args.preparer, args.people);
    let id = ledger.add(&entry)?;

    println!(
        "{} #{} ({} g by {})",
        "Saved".green().bold(),
        id,
        entry.weight_g,
        entry.stored_preparer()
    );
    Ok(())
}

pub fn edit(data: PathBuf, config: Option<PathBuf>, id: u64, args: EditArgs) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;

    let snapshot = ledger.snapshot()?;
    let Some(record) = snapshot.records().get(id) else {
        println!("{} no observation with id {}", "Not found:".yellow().bold(), id);
        return Ok(());
    };

    let entry = edited_entry(id, record, &args)?;
    match ledger.update(id, &entry)? {
        WriteOutcome::Applied => println!("{} #{}", "Updated".green().bold(), id),
        WriteOutcome::RowNotFound => {
            println!("{} no observation with id {}", "Not found:".yellow().bold(), id)
        }
    }
    Ok(())
}

pub fn delete(data: PathBuf, config: Option<PathBuf>, id: u64) -> CommandResult {
    let mut ledger = open_ledger(&data, config.as_ref())?;

    match ledger.delete(id)? {
        WriteOutcome::Applied => println!("{} #{}", "Deleted".green().bold(), id),
        WriteOutcome::RowNotFound => {
            println!("{} no observation with id {}", "Not found:".yellow().bold(), id)
        }
    }
    Ok(())
}

/// The entry an edit writes: given fields win, every other field keeps its
/// stored value.
fn edited_entry(
    id: u64,
    record: &Record,
    args: &EditArgs,
) -> Result<Entry, Box<dyn std::error::Error>> {
    let date = match &args.date {
        Some(text) => parse_date(text)?,
        None => record
            .timestamp
            .map(|t| t.date())
            .ok_or_else(|| missing("date", id))?,
    };
    let time = match &args.time {
        Some(text) => parse_time(text)?,
        None => record
            .timestamp
            .map(|t| t.time())
            .ok_or_else(|| missing("time", id))?,
    };
    let weight = args
        .weight
        .or_else(|| record.weight_g.and_then(|w| u32::try_from(w).ok()))
        .ok_or_else(|| missing("weight", id))?;
    let people = args
        .people
        .or_else(|| record.headcount.and_then(|h| u32::try_from(h).ok()))
        .ok_or_else(|| missing("people", id))?;
    let preparer = args
        .preparer
        .clone()
        .unwrap_or_else(|| record.preparer_raw.clone());

    Ok(Entry::new(date, time, weight, preparer, people))
}

fn missing(field: &str, id: u64) -> Box<dyn std::error::Error> {
    format!(
        "observation #{} has no readable {}; pass --{} explicitly",
        id, field, field
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn record(headcount: Option<i64>) -> Record {
        let timestamp = NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        Record {
            id: 7,
            timestamp: Some(timestamp),
            weight_g: Some(450),
            headcount,
            preparer_raw: "og".to_string(),
            preparer_key: "OG1".to_string(),
            weekday: None,
            weekday_label: None,
            hour_of_day: None,
            hour_int: None,
        }
    }

    fn args() -> EditArgs {
        EditArgs {
            weight: None,
            preparer: None,
            people: None,
            date: None,
            time: None,
        }
    }

    #[test]
    fn test_edit_keeps_timestamp_when_headcount_is_empty() {
        let edit = EditArgs {
            people: Some(3),
            ..args()
        };
        let entry = edited_entry(7, &record(None), &edit).unwrap();

        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert_eq!(entry.time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(entry.weight_g, 450);
        assert_eq!(entry.headcount, 3);
        assert_eq!(entry.preparer, "og");
    }

    #[test]
    fn test_edit_requires_missing_fields() {
        assert!(edited_entry(7, &record(None), &args()).is_err());

        let mut no_time = record(Some(2));
        no_time.timestamp = None;
        let err = edited_entry(7, &no_time, &args()).unwrap_err();
        assert!(err.to_string().contains("--date"));
    }
}
