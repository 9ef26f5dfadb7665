//! Input loading and data source handling.

mod cell;
mod parser;
mod source;
mod workbook;

pub use cell::CellValue;
pub use parser::{Loader, LoaderConfig};
pub use source::{Column, Dataset, SourceMetadata};
