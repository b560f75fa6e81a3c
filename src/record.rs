//! Record module for tabql
//!
//! A record is one row of a table: a mapping from column name to the raw
//! string value read from the source file. Records keep their fields in
//! insertion order so that printed output follows the source header.
//!
//! Records are plain owned values. Cloning a record copies every field, so a
//! derived table never shares storage with the table it came from.

use std::fmt;

use crate::error::{TabqlError, TabqlResult};

/// One row of a table, mapping column names to string values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Column name and value pairs in insertion order
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Set a column value
    ///
    /// If the column already exists its value is replaced in place, keeping
    /// the original column position. Otherwise the column is appended.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Look up a column value
    ///
    /// # Returns
    /// * `Ok(&str)` with the raw value
    /// * `Err(TabqlError::ColumnNotFound)` if the record has no such column
    pub fn get(&self, column: &str) -> TabqlResult<&str> {
        self.get_opt(column)
            .ok_or_else(|| TabqlError::ColumnNotFound(column.to_string()))
    }

    /// Look up a column value, returning `None` when it is absent
    pub fn get_opt(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether the record carries a column
    pub fn contains(&self, column: &str) -> bool {
        self.get_opt(column).is_some()
    }

    /// Overwrite or extend this record with every field of `other`
    ///
    /// Fields present in both records take the value from `other`.
    pub fn merge(&mut self, other: Record) {
        for (column, value) in other.fields {
            self.insert(column, value);
        }
    }

    /// Iterate over the column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over (column, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of columns in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Collect the union of columns across records in first-seen order
///
/// Tables do not enforce a fixed schema, so output headers are derived from
/// whichever columns the records actually carry.
pub fn columns_of(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for column in record.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}
