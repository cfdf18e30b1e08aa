/// Error types for the obra libraries
use thiserror::Error;

/// Main error type for quantity-table and curve operations
#[derive(Error, Debug)]
pub enum ObraError {
    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// I/O failure while reading or writing a table
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// The table carries no usable date columns
    #[error("No date columns found in the table")]
    EmptyAxis,

    /// A required column is missing from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Type alias for Results using ObraError
pub type Result<T> = std::result::Result<T, ObraError>;
