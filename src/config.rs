//! Configuration module for tabql
//!
//! This module provides a centralized configuration structure for the application.
//! It handles global settings that are passed down through the application rather
//! than using global state or passing individual settings.

use crate::csv_handler;
use crate::error::TabqlResult;

/// Application configuration
///
/// Created once at startup from the command line and passed by reference to
/// the components that need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Whether to show verbose output
    verbose: bool,

    /// Field delimiter used for both input and output
    delimiter: u8,
}

impl AppConfig {
    /// Create a new application configuration
    ///
    /// # Arguments
    /// * `verbose` - Whether to show verbose output
    /// * `field_separator` - Optional field separator from the command line
    ///
    /// # Returns
    /// * `Err` if the field separator isn't a single character
    pub fn new(verbose: bool, field_separator: Option<&str>) -> TabqlResult<Self> {
        Ok(Self {
            verbose,
            delimiter: csv_handler::parse_delimiter(field_separator)?,
        })
    }

    /// Get the verbose flag
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Get the field delimiter
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}
