//! Error types for loading, validating and appending order records

use thiserror::Error;

/// Failures while bulk-loading records from a source. Fatal at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Spreadsheet has no worksheet or no header row")]
    EmptySheet,

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Duplicate record id {0}")]
    DuplicateId(u64),

    #[error("Corrupt journal entry on line {line}: {reason}")]
    Journal { line: usize, reason: String },
}

/// Rejected append input. The store is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' expects {expected}, got '{value}'")]
    InvalidType {
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("Field '{0}' is not part of the order schema")]
    UnknownField(String),

    #[error("Field '{field}' doesn't match pattern {pattern}")]
    PatternMismatch { field: String, pattern: String },
}

/// Append failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Order ID '{0}' already exists")]
    DuplicateOrderId(String),

    #[error("Source is read-only; configure a journal to accept new records")]
    ReadOnly,

    #[error("Failed to persist record: {0}")]
    Persist(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Persist(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Persist(e.to_string())
    }
}

/// Spreadsheet export failures
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
