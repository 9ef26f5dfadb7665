//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sheetprobe: column-level profiling for spreadsheets
#[derive(Parser)]
#[command(name = "sheetprobe")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a file and report shape, types, and column summaries
    Profile {
        /// Path to the data file (xlsx/xls/xlsb/ods/csv/tsv)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Sheet to read (default: Sheet1, else the first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Columns to summarize, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Titled column group, e.g. "Area Manager Columns=am_username,am_email"
        #[arg(short, long = "group", value_name = "TITLE=COLS")]
        groups: Vec<String>,

        /// Number of leading rows to preview
        #[arg(long, default_value = "10")]
        head: usize,

        /// Number of sample values per column
        #[arg(long, default_value = "5")]
        samples: usize,

        /// Text value counted as a placeholder (repeatable, e.g. "vacant")
        #[arg(long = "placeholder", value_name = "WORD")]
        placeholders: Vec<String>,

        /// Maximum data rows to load
        #[arg(long)]
        max_rows: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the sheets in a file
    Sheets {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}
