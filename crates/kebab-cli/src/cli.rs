//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use kebab::stats::GroupBy;

/// Kebab: record observations and test who makes them heavier
#[derive(Parser)]
#[command(name = "kebab")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data file (CSV/TSV); created on the first `add`
    #[arg(short, long, global = true, default_value = "kebabs.csv")]
    pub data: PathBuf,

    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new observation
    Add(EntryArgs),

    /// Change an existing observation
    Edit {
        /// Id of the observation
        #[arg(value_name = "ID")]
        id: u64,

        #[command(flatten)]
        entry: EditArgs,
    },

    /// Remove an observation
    Delete {
        /// Id of the observation
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Show all observations, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show only the last N observations
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show the known preparers
    Preparers,

    /// Numbers and facts: distribution and group rankings
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Welch test: does one preparer make heavier kebabs?
    Compare {
        /// First preparer
        a: String,
        /// Second preparer
        b: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// One-way ANOVA on weight
    Anova {
        /// Grouping; all three when omitted
        #[arg(long, value_enum)]
        by: Option<Grouping>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Chi-square test: do preparers favour particular weekdays?
    Schedule {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Weight over time: moving average, cumulative total, histogram
    Trend {
        /// Moving-average window
        #[arg(short, long, default_value_t = kebab::stats::DEFAULT_WINDOW)]
        window: usize,

        /// Number of histogram bins
        #[arg(long, default_value_t = kebab::stats::DEFAULT_BINS)]
        bins: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Fields of a new observation.
#[derive(Args, Debug, Clone)]
pub struct EntryArgs {
    /// Weight in grams (0-1000)
    #[arg(short, long)]
    pub weight: u32,

    /// Who prepared it
    #[arg(short, long)]
    pub preparer: String,

    /// Number of people (0-50)
    #[arg(short = 'n', long, default_value = "1")]
    pub people: u32,

    /// Date as YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Time as HH:MM or HH:MM:SS (default: now)
    #[arg(long)]
    pub time: Option<String>,
}

/// Fields to change; omitted fields keep their stored value.
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Weight in grams (0-1000)
    #[arg(short, long)]
    pub weight: Option<u32>,

    /// Who prepared it
    #[arg(short, long)]
    pub preparer: Option<String>,

    /// Number of people (0-50)
    #[arg(short = 'n', long)]
    pub people: Option<u32>,

    /// Date as YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    /// Time as HH:MM or HH:MM:SS
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Grouping {
    Preparer,
    #[value(alias = "day")]
    Weekday,
    Hour,
}

impl From<Grouping> for GroupBy {
    fn from(g: Grouping) -> Self {
        match g {
            Grouping::Preparer => GroupBy::Preparer,
            Grouping::Weekday => GroupBy::Weekday,
            Grouping::Hour => GroupBy::Hour,
        }
    }
}
