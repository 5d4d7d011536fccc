//! Kebab CLI - observation ledger and statistics.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let data = cli.data;
    let config = cli.config;

    let result = match cli.command {
        Commands::Add(args) => commands::entry::add(data, config, args),

        Commands::Edit { id, entry } => commands::entry::edit(data, config, id, entry),

        Commands::Delete { id } => commands::entry::delete(data, config, id),

        Commands::List { json, limit } => commands::list::run(data, config, json, limit),

        Commands::Preparers => commands::list::preparers(data, config),

        Commands::Summary { json } => commands::summary::run(data, config, json),

        Commands::Compare { a, b, json } => commands::stats::compare(data, config, a, b, json),

        Commands::Anova { by, json } => commands::stats::anova(data, config, by, json),

        Commands::Schedule { json } => commands::stats::schedule(data, config, json),

        Commands::Trend { window, bins, json } => {
            commands::trend::run(data, config, window, bins, json)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
