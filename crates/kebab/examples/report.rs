//! Example: Print the statistics of a kebab ledger.
//!
//! Usage:
//!   cargo run --example report -- <ledger.csv>

use std::env;
use std::path::Path;

use kebab::stats::{AnovaOutcome, GroupBy, TestOutcome};
use kebab::{CsvStore, Ledger, LedgerConfig};

fn main() -> kebab::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example report -- <ledger.csv>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let config = LedgerConfig::default();
    let store = CsvStore::open(path, &config.columns);
    let mut ledger = Ledger::new(store, config)?;

    let snapshot = ledger.snapshot()?;
    for issue in &snapshot.normalization.issues {
        println!("[{}] {}", issue.severity().label(), issue);
    }

    let summary = ledger.summary()?;
    println!("{} observations", summary.total);
    if let Some(d) = &summary.distribution {
        println!("mean {:.1} g, median {:.1} g", d.mean, d.median);
    }
    for group in &summary.by_preparer {
        println!("  {:<8} {:>7.1} g  (n = {})", group.label, group.mean, group.count);
    }
    println!();

    for by in GroupBy::ALL {
        match ledger.anova(by)? {
            AnovaOutcome::Tested(test) => println!(
                "ANOVA by {}: F = {:.3}, p = {:.4}",
                by, test.f, test.p_value
            ),
            AnovaOutcome::InsufficientData { .. } => {
                println!("ANOVA by {}: not enough data", by)
            }
        }
    }

    let schedule = ledger.schedule()?;
    if let TestOutcome::Tested(test) = schedule.test {
        println!(
            "Weekday x preparer: chi2 = {:.3}, dof = {}, p = {:.4}",
            test.chi2, test.dof, test.p_value
        );
    }

    Ok(())
}
