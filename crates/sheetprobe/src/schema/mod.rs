//! Schema types for representing inferred column structure.

mod types;

pub use types::ColumnType;
