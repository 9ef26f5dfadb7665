//! Column profiling: per-column summary statistics.

mod summary;

pub use summary::{summarize, summarize_with, ColumnSummary, SummaryOptions};
