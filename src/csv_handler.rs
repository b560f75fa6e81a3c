//! CSV file handling module for tabql
//!
//! This module moves data between delimited text and in-memory tables:
//!
//! - Parsing file specifications in the format [table_name=]file_path
//! - Loading files with a header row into tables of raw string records
//! - Custom field separators, similar to awk's -F option
//! - Writing records and pivot rows back out as delimited text
//!
//! Values are never converted on load. Every cell is kept as the exact string
//! found in the file; numeric coercion happens later, during aggregation.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;

use crate::error::{TabqlError, TabqlResult};
use crate::record::{columns_of, Record};
use crate::table::{Table, Value};

/// Parse a file specification into table name and file path
///
/// Handles two formats:
/// 1. `table_name=file_path.csv` - Explicit table name and file path
/// 2. `file_path.csv` - Table name derived from file name
///
/// # Returns
/// * `Ok((String, PathBuf))` - Tuple of (table_name, file_path)
/// * `Err` - If the file specification is invalid
pub fn parse_file_spec(file_spec: &str) -> TabqlResult<(String, PathBuf)> {
    if let Some((table_name, file_path)) = file_spec.split_once('=') {
        if table_name.is_empty() || file_path.is_empty() {
            return Err(TabqlError::InvalidFileSpec(file_spec.to_string()));
        }
        Ok((table_name.to_string(), PathBuf::from(file_path)))
    } else {
        let path = PathBuf::from(file_spec);
        let stem = path
            .file_stem()
            .ok_or_else(|| TabqlError::InvalidFileSpec(file_spec.to_string()))?;

        Ok((stem.to_string_lossy().to_string(), path))
    }
}

/// Turn a field separator argument into a delimiter byte
///
/// Accepts a single ASCII character, or `\t` / `tab` for tab-separated files.
/// Without a separator, commas are used.
pub fn parse_delimiter(field_separator: Option<&str>) -> TabqlResult<u8> {
    match field_separator {
        None => Ok(b','),
        Some("\\t") | Some("\t") | Some("tab") => Ok(b'\t'),
        Some(sep) if sep.len() == 1 && sep.is_ascii() => Ok(sep.as_bytes()[0]),
        Some(sep) => Err(TabqlError::InvalidExpression(format!(
            "field separator must be a single ASCII character, got '{}'",
            sep
        ))),
    }
}

/// Load a delimited file into a table
///
/// # Arguments
/// * `file_spec` - File specification in the format `[table_name=]file_path`
/// * `delimiter` - Field delimiter byte
///
/// # Returns
/// * `Ok(Table)` named after the spec, one record per data row
/// * `Err` if the spec is invalid or the file can't be opened or parsed
pub fn load_table(file_spec: &str, delimiter: u8) -> TabqlResult<Table> {
    let (table_name, file_path) = parse_file_spec(file_spec)?;
    let file = File::open(&file_path)?;
    read_table(&table_name, BufReader::new(file), delimiter)
}

/// Read delimited data with a header row into a table
///
/// Rows shorter than the header produce records without the trailing
/// columns; fields beyond the header are ignored.
pub fn read_table<R: Read>(table_name: &str, reader: R, delimiter: u8) -> TabqlResult<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let record: Record = headers.iter().zip(row.iter()).collect();
        records.push(record);
    }

    let columns = headers.iter().map(str::to_string).collect();
    Ok(Table::with_columns(table_name, columns, records))
}

/// Write records as delimited text with a header row
///
/// The header is `header` followed by any record columns it doesn't name,
/// in first-seen order, so it is written even when there are no records.
/// Cells for columns a record doesn't carry are written empty.
pub fn write_records<W: Write>(
    writer: W,
    header: &[String],
    records: &[Record],
    delimiter: u8,
) -> TabqlResult<()> {
    let mut columns = header.to_vec();
    for column in columns_of(records) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    if columns.is_empty() {
        return Ok(());
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(&columns)?;
    for record in records {
        csv_writer.write_record(
            columns
                .iter()
                .map(|column| record.get_opt(column).unwrap_or("")),
        )?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write rows of values as delimited text under the given header
pub fn write_rows<W: Write>(
    writer: W,
    header: &[String],
    rows: &[Vec<Value>],
    delimiter: u8,
) -> TabqlResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(header)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}
