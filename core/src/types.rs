//! Shared primitive types used across the submission pipeline.

/// One record from the data source: cell strings in column order.
pub type Row = Vec<String>;

/// 1-based row number inside the source sheet, used in diagnostics.
pub type RowNumber = usize;

/// The canonical run identifier.
pub type RunId = String;
