#![forbid(unsafe_code)]

//! Command-line support: dataset import and result export.

/// CSV dataset loading and result-table export.
///
/// Maps dataset columns onto [`crate::Record`] fields and writes report tables
/// back out as CSV.
pub mod import_export;
