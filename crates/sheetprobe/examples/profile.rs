//! Example: Profile selected columns of a spreadsheet.
//!
//! Usage:
//!   cargo run --example profile -- <file_path> [column ...]
//!
//! Example:
//!   cargo run --example profile -- rm_store_structure.xlsx am_username am_email

use std::env;

use sheetprobe::{summarize, Loader};

fn main() -> sheetprobe::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example profile -- <file_path> [column ...]");
        std::process::exit(1);
    }

    let (dataset, source) = Loader::new().load(&args[1])?;

    let separator = "=".repeat(50);
    println!("{}", separator);
    println!("Profile: {} (sheet '{}')", source.file, source.sheet);
    println!("{}", separator);
    println!("Shape: {:?}", dataset.shape());
    println!("Columns: {:?}", dataset.column_names());

    let requested: Vec<&str> = if args.len() > 2 {
        args[2..].iter().map(String::as_str).collect()
    } else {
        dataset.column_names()
    };

    for (name, summary) in summarize(&dataset, requested.as_slice()) {
        let samples: Vec<String> = summary.samples.iter().map(ToString::to_string).collect();

        println!();
        println!("{}:", name);
        println!("  - Total entries: {}", summary.total);
        println!("  - Non-null entries: {}", summary.non_missing);
        println!("  - Null/empty entries: {}", summary.missing);
        println!("  - Unique values: {}", summary.distinct);
        println!("  - Sample values: {:?}", samples);
    }

    Ok(())
}
