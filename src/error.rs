//! Error handling for tabql
//!
//! This module defines the error type shared by the query engine, the
//! catalog, the file loader and the command-line front end.
//!
//! The module uses thiserror to minimize boilerplate code. Errors raised by
//! caller-supplied reducers travel through the same type so that they reach
//! the caller unmodified.

use thiserror::Error;

/// TabqlError represents all possible errors that can occur in tabql
///
/// This enum covers failures during:
/// - File I/O and delimited file parsing
/// - Column lookups inside records (filter, join, aggregate, pivot)
/// - Reducer evaluation (empty groups, non-numeric input)
/// - Parsing of command-line expressions
#[derive(Error, Debug)]
pub enum TabqlError {
    /// Error during file system operations (reading/writing files)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while parsing or writing delimited file data
    #[error("File parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error when a referenced table isn't registered in the catalog
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// Error when a record doesn't carry a referenced column
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// Error for invalid file=table specifications
    #[error("Invalid file specification: {0}")]
    InvalidFileSpec(String),

    /// Error for malformed filter, join or aggregate expressions
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// Error for values a reducer cannot work with
    #[error("Type error: {0}")]
    TypeError(String),

    /// Error for reducers that need at least one value
    #[error("{0}() applied to an empty group")]
    EmptyGroup(String),

    /// Error for division by zero, e.g. the mean of an empty group
    #[error("Division by zero")]
    DivideByZero,

    /// Error reported by a caller-supplied reducer
    #[error("Reducer failed: {0}")]
    Reducer(String),
}

/// Result type alias for operations that can produce a TabqlError
pub type TabqlResult<T> = std::result::Result<T, TabqlError>;
