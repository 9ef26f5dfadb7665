//! sheetprobe CLI - column-level profiling for spreadsheets.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use log::LevelFilter;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Profile {
            file,
            sheet,
            columns,
            groups,
            head,
            samples,
            placeholders,
            max_rows,
            json,
        } => commands::profile::run(commands::profile::ProfileArgs {
            file,
            sheet,
            columns,
            groups,
            head,
            samples,
            placeholders,
            max_rows,
            json,
        }),

        Commands::Sheets { file } => commands::sheets::run(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
