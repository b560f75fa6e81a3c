//! tabql - a query tool for delimiter-separated files
//!
//! This tool loads CSV and delimiter-separated files into memory as named
//! tables and runs one query pipeline over them: join, filter, then project,
//! aggregate or pivot.
//!
//! # Program Flow
//!
//! 1. Parse command-line arguments
//! 2. Load specified files into the catalog
//! 3. Build the query pipeline from the arguments
//! 4. Execute it and print the result to stdout

use std::io;

use anyhow::{Context, Result};

use tabql::cli;
use tabql::condition::Condition;
use tabql::config::AppConfig;
use tabql::csv_handler;
use tabql::query::{parse_pivot_value, AggregateSpec, Finish, JoinSpec, Query, QueryExecutor, QueryResult};
use tabql::Database;

/// Main entry point for the tabql utility
///
/// # Returns
/// * `Ok(())` if all operations completed successfully
/// * `Err` with context if any step fails
fn main() -> Result<()> {
    // Step 1: Parse command-line arguments
    let args = cli::parse_args()?;

    let config = AppConfig::new(args.verbose, args.field_separator.as_deref())
        .context("Invalid field separator")?;

    if config.verbose() {
        eprintln!("Running in verbose mode");
        eprintln!("Arguments: {args:?}");
    }

    // Step 2: Load every file into the catalog
    let mut database = Database::new();
    for file_spec in &args.files {
        let table = csv_handler::load_table(file_spec, config.delimiter())
            .with_context(|| format!("Failed to load file: {file_spec}"))?;
        if config.verbose() {
            eprintln!("Table '{}' loaded ({} rows)", table.name(), table.row_count());
        }
        database.insert(table);
    }

    // Step 3: Build the query
    let query = build_query(&args, &database)?;

    // Step 4: Execute and print
    let executor = QueryExecutor::new(&database, config.verbose());
    let result = executor
        .execute(&query)
        .with_context(|| format!("Failed to query table: {}", query.table))?;

    let stdout = io::stdout();
    match result {
        QueryResult::Table(table) => table.print_to_stdout(config.delimiter())?,
        QueryResult::Records { header, records } => {
            csv_handler::write_records(stdout.lock(), &header, &records, config.delimiter())?
        }
        QueryResult::Scalars(scalars) => {
            for (label, value) in scalars {
                println!("{label}={value}");
            }
        }
        QueryResult::Pivot { header, rows } => {
            let cells: Vec<_> = rows.iter().map(|row| row.cells()).collect();
            csv_handler::write_rows(stdout.lock(), &header, &cells, config.delimiter())?
        }
    }

    Ok(())
}

/// Translate parsed arguments into a query pipeline
fn build_query(args: &cli::TabqlArgs, database: &Database) -> Result<Query> {
    let table = match &args.table {
        Some(name) => name.clone(),
        None => database
            .table_names()
            .into_iter()
            .next()
            .context("No tables loaded")?,
    };

    let joins = args
        .join
        .iter()
        .map(|spec| JoinSpec::parse(spec))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid join")?;

    let conditions = args
        .conditions
        .iter()
        .map(|expr| Condition::parse(expr))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid condition")?;

    let finish = if !args.select.is_empty() {
        Finish::Select(args.select.clone())
    } else if !args.aggregate.is_empty() {
        let specs = args
            .aggregate
            .iter()
            .map(|spec| AggregateSpec::parse(spec))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid aggregate")?;
        Finish::Aggregate(specs)
    } else if !args.pivot.is_empty() {
        let aggregates = if args.values.is_empty() {
            vec![parse_pivot_value("count")?]
        } else {
            args.values
                .iter()
                .map(|spec| parse_pivot_value(spec))
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid pivot value")?
        };
        Finish::Pivot {
            dimensions: args.pivot.clone(),
            aggregates,
        }
    } else {
        Finish::Table
    };

    Ok(Query {
        table,
        joins,
        conditions,
        finish,
    })
}
