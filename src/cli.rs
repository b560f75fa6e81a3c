//! CLI argument parsing module for tabql
//!
//! This module handles parsing command-line arguments using the clap crate.
//! A command line describes one query pipeline over the loaded files:
//!
//! - pick a source table
//! - join other tables onto it, in order
//! - filter the result with `column OP value` conditions
//! - finish with a projection, scalar aggregates or a pivot
//!
//! Without a finishing stage the joined and filtered table is printed.

use anyhow::Result;
use clap::Parser;

/// Command-line arguments for tabql
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Filter, join, aggregate and pivot delimiter-separated files"
)]
pub struct TabqlArgs {
    /// Input files to load - format: [table_name=]file_path
    ///
    /// If no table name is specified, the base filename (without extension)
    /// is used as the table name.
    /// Example: people=data/users.csv or just data/Cities.csv
    #[clap(
        required = true,
        help = "Input files to load as [table_name=]file_path"
    )]
    pub files: Vec<String>,

    /// Source table of the query
    ///
    /// Defaults to the table loaded from the first file.
    #[clap(short, long, help = "Table to query (default: first file)")]
    pub table: Option<String>,

    /// Join another table on a shared column - format: table:key
    ///
    /// Joins are applied in the order given, each to the result of the
    /// previous one. On a column name collision the joined table's value wins.
    #[clap(
        short,
        long,
        value_name = "TABLE:KEY",
        help = "Join a table on a shared column"
    )]
    pub join: Vec<String>,

    /// Keep only rows matching a condition - format: column OP value
    ///
    /// OP is one of =, ==, !=, <, <=, >, >= or ~ (substring). Multiple
    /// conditions must all hold.
    /// Example: -w "EU=no" -w "temperature<5.0"
    #[clap(
        short = 'w',
        long = "where",
        value_name = "EXPR",
        help = "Filter condition as column OP value"
    )]
    pub conditions: Vec<String>,

    /// Print only these columns
    #[clap(
        short,
        long,
        value_delimiter = ',',
        conflicts_with_all = ["aggregate", "pivot"],
        help = "Comma-separated columns to print"
    )]
    pub select: Vec<String>,

    /// Reduce a column to a single value - format: func:column
    ///
    /// func is one of count, sum, mean (avg), min, max.
    /// Example: -a mean:temperature -a count:city
    #[clap(
        short,
        long,
        value_name = "FUNC:COLUMN",
        conflicts_with = "pivot",
        help = "Aggregate a column as func:column"
    )]
    pub aggregate: Vec<String>,

    /// Group by these columns and print one row per combination of values
    #[clap(
        short,
        long,
        value_delimiter = ',',
        help = "Comma-separated columns to pivot on"
    )]
    pub pivot: Vec<String>,

    /// Aggregate computed for each pivot group - format: func:column or count
    ///
    /// A bare `count` counts the rows of each group. Defaults to `count`.
    #[clap(
        long = "value",
        value_name = "FUNC[:COLUMN]",
        requires = "pivot",
        help = "Pivot aggregate as func:column, or count"
    )]
    pub values: Vec<String>,

    /// Specify field separator character
    ///
    /// Similar to awk's -F option, this sets the field separator for all input
    /// files and for the output.
    #[clap(short = 'F', help = "Field separator character")]
    pub field_separator: Option<String>,

    /// Enable verbose diagnostic output
    #[clap(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Parse command-line arguments into the TabqlArgs structure
pub fn parse_args() -> Result<TabqlArgs> {
    Ok(TabqlArgs::parse())
}
