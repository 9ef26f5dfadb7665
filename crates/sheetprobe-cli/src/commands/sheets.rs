//! Sheets command - list the sheets in a file.

use std::path::PathBuf;

use colored::Colorize;
use sheetprobe::Probe;

pub fn run(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let sheets = Probe::new().sheet_names(&file)?;

    println!(
        "{} {}",
        "Sheets in".cyan().bold(),
        file.display().to_string().white()
    );
    for (index, name) in sheets.iter().enumerate() {
        println!("  {}. {}", index + 1, name);
    }

    Ok(())
}
