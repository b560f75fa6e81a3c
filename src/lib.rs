//! tabql library crate
//!
//! An in-memory, relational-style query toolkit over tables loaded from
//! delimited files. The library provides:
//!
//! - Tables of string records with no fixed schema
//! - Filter, equi-join, projection and aggregation, each producing new values
//! - Built-in reducers (count, sum, mean, min, max) next to caller-supplied ones
//! - Pivot tables over the full cross product of dimension values
//! - A catalog of named tables with first-match lookup
//! - CSV and delimiter-separated loading and output
//!
//! Numeric conversion is lazy and best effort: values stay strings until a
//! column is aggregated, and values that don't parse as numbers are handed to
//! reducers unchanged.

pub mod aggregate;
pub mod cli;
pub mod combination;
pub mod condition;
pub mod config;
pub mod csv_handler;
pub mod database;
pub mod error;
pub mod pivot;
pub mod query;
pub mod record;
pub mod table;

pub use aggregate::AggregateFunction;
pub use database::Database;
pub use error::{TabqlError, TabqlResult};
pub use pivot::{PivotAggregate, PivotRow};
pub use record::Record;
pub use table::{Table, Value};
