//! Error types for the cleaning pipeline

use thiserror::Error;

/// Errors surfaced by loading, editing and exporting tables.
///
/// Every variant renders as a sentence that can be shown to the user as-is.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Unsupported file format: '{0}' (expected xlsx, xls, csv or txt)")]
    UnsupportedFormat(String),

    #[error("The input is empty: no header line was found")]
    EmptyInput,

    #[error("Line {line} has {found} fields but the header has {expected}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    #[error("Duplicate column name: '{0}'")]
    DuplicateColumnName(String),

    #[error("Cannot convert column '{column}' to {target}: value '{value}' at row {row} is not valid")]
    TypeConversion {
        column: String,
        target: String,
        value: String,
        row: usize,
    },

    #[error("Failed to fetch remote dataset from {url}: {message}")]
    RemoteFetch { url: String, message: String },

    #[error("Row index {index} is out of range (table has {row_count} rows)")]
    IndexRange { index: usize, row_count: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("Failed to write spreadsheet archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl From<calamine::XlsxError> for CleanError {
    fn from(e: calamine::XlsxError) -> Self {
        CleanError::Spreadsheet(e.to_string())
    }
}

impl From<calamine::XlsError> for CleanError {
    fn from(e: calamine::XlsError) -> Self {
        CleanError::Spreadsheet(e.to_string())
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, CleanError>;
