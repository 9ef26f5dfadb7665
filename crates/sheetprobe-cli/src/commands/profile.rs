//! Profile command - load a file and print column statistics.

use std::path::PathBuf;

use colored::Colorize;
use sheetprobe::{
    CellValue, ColumnGroup, LoaderConfig, Probe, ProbeConfig, ProbeReport, SummaryOptions,
};

/// Title used for columns passed with `--columns`.
const REQUESTED_TITLE: &str = "Requested Columns";

pub struct ProfileArgs {
    pub file: PathBuf,
    pub sheet: Option<String>,
    pub columns: Vec<String>,
    pub groups: Vec<String>,
    pub head: usize,
    pub samples: usize,
    pub placeholders: Vec<String>,
    pub max_rows: Option<usize>,
    pub json: bool,
}

pub fn run(args: ProfileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let groups = build_groups(&args.columns, &args.groups)?;

    let mut loader = LoaderConfig::default();
    loader.sheet = args.sheet;
    loader.max_rows = args.max_rows;

    let mut summary = SummaryOptions::default().with_sample_limit(args.samples);
    for word in args.placeholders {
        summary = summary.with_placeholder(word);
    }

    let probe = Probe::with_config(ProbeConfig {
        loader,
        summary,
        head_rows: args.head,
        ..ProbeConfig::default()
    });

    let report = probe.run(&args.file, &groups)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn build_groups(
    columns: &[String],
    groups: &[String],
) -> Result<Vec<ColumnGroup>, Box<dyn std::error::Error>> {
    let mut parsed = Vec::new();

    if !columns.is_empty() {
        parsed.push(ColumnGroup::new(REQUESTED_TITLE, columns.iter().cloned()));
    }
    for spec in groups {
        parsed.push(spec.parse::<ColumnGroup>()?);
    }

    Ok(parsed)
}

fn print_report(report: &ProbeReport) {
    let separator = "=".repeat(50);

    println!(
        "{} {} (sheet '{}')",
        "Profiling".cyan().bold(),
        report.source.path.display().to_string().white(),
        report.source.sheet
    );
    if report.source.sheet_names.len() > 1 {
        println!("Sheet names: {:?}", report.source.sheet_names);
    }
    println!();

    println!("Shape: ({}, {})", report.shape.0, report.shape.1);
    println!();
    println!("{}", "Column names:".yellow().bold());
    println!("{:?}", report.columns);
    println!();

    println!(
        "{}",
        format!("First {} rows:", report.preview.len()).yellow().bold()
    );
    print_preview(&report.columns, &report.preview);

    for group in &report.groups {
        println!();
        println!("{}", separator);
        println!("{}", format!("{}:", group.title).yellow().bold());

        for column in &group.columns {
            let s = &column.summary;
            let samples: Vec<String> = s.samples.iter().map(render_cell).collect();

            println!();
            println!("{}:", column.name.white().bold());
            println!("  - Total entries: {}", s.total);
            println!("  - Non-null entries: {}", s.non_missing.to_string().green());
            println!("  - Null/empty entries: {}", missing_colored(s.missing, s.total));
            println!("  - Unique values: {}", s.distinct);
            if let Some(placeholder) = s.placeholder {
                println!("  - Placeholder values: {}", placeholder.to_string().yellow());
            }
            println!("  - Sample values: [{}]", samples.join(", "));
        }
    }

    if let Some(found) = &report.placeholder_rows {
        println!();
        println!("{}", separator);
        println!("{}", "Rows with placeholder values:".yellow().bold());
        println!("Found {} rows with placeholder values", found.count);

        for (index, row) in found.rows.iter().enumerate() {
            println!();
            println!("Row #{}:", index + 1);
            for (name, cell) in found.columns.iter().zip(row) {
                println!("  {}: \"{}\"", name, cell);
            }
        }
    }

    println!();
    println!("{}", separator);
    println!("{}", "Data types of all columns:".yellow().bold());
    let width = name_width(&report.columns);
    for (name, dtype) in &report.dtypes {
        println!("  {:width$}  {}", name, dtype, width = width);
    }
}

/// Display width of the widest column name.
fn name_width(columns: &[String]) -> usize {
    columns.iter().map(|c| c.chars().count()).max().unwrap_or(0)
}

fn print_preview(columns: &[String], rows: &[Vec<CellValue>]) {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    for row in &rendered {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:w$}", c, w = w))
        .collect();
    println!("     {}", header.join("  ").bold());

    for (index, row) in rendered.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:w$}", c, w = w))
            .collect();
        println!("{:>4} {}", index, cells.join("  "));
    }
}

fn render_cell(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => format!("'{}'", s),
        CellValue::DateTime(_) => format!("'{}'", value),
        other => other.to_string(),
    }
}

fn missing_colored(missing: usize, total: usize) -> colored::ColoredString {
    let text = missing.to_string();
    if missing == 0 {
        text.green()
    } else if missing * 2 < total {
        text.yellow()
    } else {
        text.red()
    }
}
