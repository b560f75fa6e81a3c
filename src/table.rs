//! Table module for tabql
//!
//! This module provides the in-memory table representation and the primitive
//! query operations of the engine:
//!
//! - Filtering rows with a caller-supplied predicate
//! - Nested-loop equi-joins on a single shared column
//! - Projection of records onto a list of columns
//! - Aggregation of one column through a caller-supplied reducer
//!
//! Every operation builds a new table (or value) and leaves the receiver
//! untouched. Row order always follows the order rows were visited.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::csv_handler;
use crate::error::TabqlResult;
use crate::record::{columns_of, Record};

/// Represents a value handed to a reducer
///
/// Raw column values are strings. When a column is aggregated each value is
/// coerced on a best-effort basis: anything that parses as a floating point
/// number becomes `Number`, everything else is passed through as `Text`.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit floating point number
    Number(f64),
    /// Original string, not coercible to a number
    Text(String),
}

impl Value {
    /// Coerce a raw column value
    ///
    /// Leading and trailing whitespace is ignored for the numeric parse only;
    /// a value that fails to parse keeps its exact original text.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(number) => Value::Number(number),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    /// Get the numeric value, if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Whether this value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::coerce(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// Ordering between values
///
/// Numbers compare numerically and strings lexicographically. Across types,
/// every number orders before every string.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering;

        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            (Value::Number(_), Value::Text(_)) => Some(Ordering::Less),
            (Value::Text(_), Value::Number(_)) => Some(Ordering::Greater),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Values serialize as their display text, so numbers written to a file
/// look the same as numbers printed to the terminal.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(_) => serializer.collect_str(self),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Represents an in-memory table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name of the table
    name: String,

    /// Declared columns, kept even when no row carries them
    columns: Vec<String>,

    /// Rows of data, in source order
    records: Vec<Record>,
}

impl Table {
    /// Create a new empty table with the given name
    pub fn new(name: &str) -> Self {
        Table {
            name: name.to_string(),
            columns: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Create a table from an ordered sequence of records
    ///
    /// The columns are those the records carry, in first-seen order.
    pub fn from_records(name: &str, records: Vec<Record>) -> Self {
        Table::with_columns(name, Vec::new(), records)
    }

    /// Create a table with a declared header
    ///
    /// Columns carried by a record but missing from `columns` are appended,
    /// so the header always covers every row.
    pub fn with_columns(name: &str, columns: Vec<String>, records: Vec<Record>) -> Self {
        let mut columns = columns;
        for column in columns_of(&records) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }

        Table {
            name: name.to_string(),
            columns,
            records,
        }
    }

    /// Get the name of the table
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the records of the table
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Get the row count
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Get the columns of the table
    ///
    /// Records may carry differing key sets, so this is the declared header
    /// extended with every record column in the order it is first seen. A
    /// table derived from another keeps its source's columns even when no
    /// rows survive.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Print the table to stdout, header first, using the given delimiter
    pub fn print_to_stdout(&self, delimiter: u8) -> TabqlResult<()> {
        let stdout = std::io::stdout();
        csv_handler::write_records(stdout.lock(), &self.columns, &self.records, delimiter)
    }

    /// Create a new table with the rows matching a predicate
    ///
    /// The result is named `<name>_filtered` and keeps the original row order.
    /// An error returned by the predicate (typically a missing column) aborts
    /// the filter and is returned unchanged.
    ///
    /// # Arguments
    /// * `predicate` - A function deciding whether a record is kept
    ///
    /// # Returns
    /// * A new table containing only the matching records
    pub fn filter<F>(&self, predicate: F) -> TabqlResult<Self>
    where
        F: Fn(&Record) -> TabqlResult<bool>,
    {
        let mut result = Table::new(&format!("{}_filtered", self.name));
        result.columns = self.columns.clone();

        for record in &self.records {
            if predicate(record)? {
                result.records.push(record.clone());
            }
        }

        Ok(result)
    }

    /// Perform an equi-join with another table on a shared column
    ///
    /// Every pair of records whose `key` values are equal strings produces one
    /// output record: a copy of the left record extended with a copy of the
    /// right record. On a column name collision the right value wins.
    /// Duplicate keys on either side multiply the output rows.
    ///
    /// This is a nested-loop join: the key is read from both records for each
    /// pair visited, so a record missing `key` fails the join as soon as it
    /// takes part in a comparison.
    ///
    /// # Arguments
    /// * `other` - The right-hand table
    /// * `key` - Column name present in both tables
    ///
    /// # Returns
    /// * A new table named `<left>_joins_<right>`
    pub fn join(&self, other: &Table, key: &str) -> TabqlResult<Self> {
        let mut result = Table::new(&format!("{}_joins_{}", self.name, other.name));
        result.columns = self.columns.clone();
        for column in &other.columns {
            if !result.columns.contains(column) {
                result.columns.push(column.clone());
            }
        }

        for left in &self.records {
            for right in &other.records {
                if left.get(key)? == right.get(key)? {
                    let mut merged = left.clone();
                    merged.merge(right.clone());
                    result.records.push(merged);
                }
            }
        }

        Ok(result)
    }

    /// Project every record onto a list of columns
    ///
    /// Unlike the other operations this returns plain records, not a table.
    /// Requested columns a record doesn't carry are left out of that record
    /// rather than reported as errors.
    pub fn select(&self, columns: &[&str]) -> Vec<Record> {
        self.records
            .iter()
            .map(|record| {
                record
                    .iter()
                    .filter(|(column, _)| columns.contains(column))
                    .collect()
            })
            .collect()
    }

    /// Extract one column as coerced values
    ///
    /// # Returns
    /// * `Ok(Vec<Value>)` in row order
    /// * `Err(TabqlError::ColumnNotFound)` if any record lacks the column
    pub fn column_values(&self, key: &str) -> TabqlResult<Vec<Value>> {
        self.records
            .iter()
            .map(|record| record.get(key).map(Value::coerce))
            .collect()
    }

    /// Reduce one column to a single result
    ///
    /// The reducer receives the coerced values of `key` for every row, in row
    /// order, and its result (or error) is returned verbatim.
    ///
    /// # Arguments
    /// * `reducer` - Function reducing the column values
    /// * `key` - Column to aggregate
    pub fn aggregate<F, T>(&self, reducer: F, key: &str) -> TabqlResult<T>
    where
        F: FnOnce(&[Value]) -> TabqlResult<T>,
    {
        let values = self.column_values(key)?;
        reducer(&values)
    }

    /// Collect the distinct raw values of a column, sorted
    ///
    /// # Returns
    /// * `Err(TabqlError::ColumnNotFound)` if any record lacks the column
    pub fn distinct_values(&self, key: &str) -> TabqlResult<BTreeSet<String>> {
        self.records
            .iter()
            .map(|record| record.get(key).map(str::to_string))
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[", self.name)?;
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", record)?;
        }
        write!(f, "]")
    }
}
