//! sheetprobe: column-level profiling for spreadsheet and delimited files.
//!
//! A file is loaded once into an immutable [`Dataset`]; the column profiler
//! then reports, for each requested column, how many cells are filled, how
//! many are missing, how many distinct values appear, and the first few
//! values in row order.
//!
//! # Example
//!
//! ```no_run
//! use sheetprobe::{summarize, Loader};
//!
//! let (dataset, source) = Loader::new().load("rm_store_structure.xlsx").unwrap();
//! println!("Shape: {:?}", dataset.shape());
//!
//! for (name, summary) in summarize(&dataset, &["am_username", "am_email"]) {
//!     println!("{}: {} of {} filled", name, summary.non_missing, summary.total);
//! }
//! # let _ = source;
//! ```

pub mod error;
pub mod input;
pub mod profile;
pub mod schema;

mod probe;

pub use crate::probe::{
    ColumnGroup, ColumnReport, GroupReport, PlaceholderRows, Probe, ProbeConfig, ProbeReport,
    ALL_COLUMNS_TITLE,
};
pub use error::{ProbeError, Result};
pub use input::{CellValue, Column, Dataset, Loader, LoaderConfig, SourceMetadata};
pub use profile::{summarize, summarize_with, ColumnSummary, SummaryOptions};
pub use schema::ColumnType;
