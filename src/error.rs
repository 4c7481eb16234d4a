use std::io;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FileOrgError>;

/// Errors raised by the file organizations, the dataset loader and the report writer.
#[derive(Debug, Error)]
pub enum FileOrgError {
    /// Underlying I/O failure while reading a dataset or writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// CSV reader or writer failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// A dataset row could not be mapped onto a [`crate::Record`].
    #[error("dataset row {row}, column '{column}': {message}")]
    Dataset {
        /// One-based data row number (header excluded).
        row: usize,
        /// Column name as it appears in the header.
        column: String,
        /// What was wrong with the cell.
        message: String,
    },
    /// Options that cannot produce a working organization.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A record whose size proxy exceeds an empty block's budget.
    #[error("record of size {size} does not fit in a block of capacity {capacity}")]
    RecordTooLarge {
        /// Size proxy of the rejected record.
        size: usize,
        /// Configured block capacity.
        capacity: usize,
    },
}

impl FileOrgError {
    pub(crate) fn dataset(row: usize, column: &str, message: impl Into<String>) -> Self {
        FileOrgError::Dataset {
            row,
            column: column.to_string(),
            message: message.into(),
        }
    }
}
