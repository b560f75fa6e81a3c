//! Query execution module for tabql
//!
//! This module turns a parsed command line into a pipeline of engine calls
//! against the catalog: source table, joins, filters, then an optional
//! finishing stage (projection, scalar aggregates or pivot).

use crate::aggregate::AggregateFunction;
use crate::condition::Condition;
use crate::database::Database;
use crate::error::{TabqlError, TabqlResult};
use crate::pivot::{PivotAggregate, PivotRow};
use crate::record::Record;
use crate::table::{Table, Value};

/// Join stage: `table:key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    /// Right-hand table name
    pub table: String,
    /// Shared column to join on
    pub key: String,
}

impl JoinSpec {
    /// Parse a `table:key` join specification
    pub fn parse(spec: &str) -> TabqlResult<Self> {
        match spec.split_once(':') {
            Some((table, key)) if !table.is_empty() && !key.is_empty() => Ok(JoinSpec {
                table: table.to_string(),
                key: key.to_string(),
            }),
            _ => Err(TabqlError::InvalidExpression(format!(
                "join '{}' is not of the form table:key",
                spec
            ))),
        }
    }
}

/// Scalar aggregate stage: `func:column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    /// Reducer to apply
    pub function: AggregateFunction,
    /// Column to reduce
    pub column: String,
}

impl AggregateSpec {
    /// Parse a `func:column` aggregate specification
    pub fn parse(spec: &str) -> TabqlResult<Self> {
        let (name, column) = spec.split_once(':').ok_or_else(|| {
            TabqlError::InvalidExpression(format!("aggregate '{}' is not of the form func:column", spec))
        })?;

        let function = AggregateFunction::from_name(name).ok_or_else(|| {
            TabqlError::InvalidExpression(format!("unknown aggregate function '{}'", name))
        })?;

        if column.is_empty() {
            return Err(TabqlError::InvalidExpression(format!(
                "aggregate '{}' has no column",
                spec
            )));
        }

        Ok(AggregateSpec {
            function,
            column: column.to_string(),
        })
    }

    /// Output label, e.g. `mean(temperature)`
    pub fn label(&self) -> String {
        format!("{}({})", self.function.name(), self.column)
    }
}

/// Parse a pivot value specification
///
/// A bare `count` counts the rows of each group; anything else must be
/// `func:column`.
pub fn parse_pivot_value(spec: &str) -> TabqlResult<PivotAggregate> {
    if spec.eq_ignore_ascii_case("count") {
        return Ok(PivotAggregate::row_count());
    }
    let aggregate = AggregateSpec::parse(spec)?;
    Ok(PivotAggregate::field(&aggregate.column, aggregate.function))
}

/// Finishing stage of a query
#[derive(Debug)]
pub enum Finish {
    /// Return the joined and filtered table as is
    Table,
    /// Project onto these columns
    Select(Vec<String>),
    /// Compute these scalar aggregates
    Aggregate(Vec<AggregateSpec>),
    /// Pivot on these dimensions with these aggregates
    Pivot {
        /// Dimension columns
        dimensions: Vec<String>,
        /// Per-group aggregates
        aggregates: Vec<PivotAggregate>,
    },
}

/// A complete query pipeline
#[derive(Debug)]
pub struct Query {
    /// Source table name
    pub table: String,
    /// Joins, applied in order
    pub joins: Vec<JoinSpec>,
    /// Conditions, applied in order as chained filters
    pub conditions: Vec<Condition>,
    /// Finishing stage
    pub finish: Finish,
}

/// Result of running a query
#[derive(Debug)]
pub enum QueryResult {
    /// A derived table
    Table(Table),
    /// Projected records
    Records {
        /// Selected columns the source table declares, in table order
        header: Vec<String>,
        /// One projected record per row
        records: Vec<Record>,
    },
    /// Labelled scalar aggregates, in the order requested
    Scalars(Vec<(String, Value)>),
    /// Pivot output with its header
    Pivot {
        /// Dimension names followed by aggregate labels
        header: Vec<String>,
        /// One row per group
        rows: Vec<PivotRow>,
    },
}

/// Query executor
pub struct QueryExecutor<'a> {
    /// Catalog the query reads from
    database: &'a Database,

    /// Verbose mode flag
    verbose: bool,
}

impl<'a> QueryExecutor<'a> {
    /// Create a new executor over the given catalog
    pub fn new(database: &'a Database, verbose: bool) -> Self {
        QueryExecutor { database, verbose }
    }

    /// Execute a query
    ///
    /// # Returns
    /// * The output of the finishing stage
    /// * `Err` if a table isn't registered, a column is missing, or a reducer
    ///   fails
    pub fn execute(&self, query: &Query) -> TabqlResult<QueryResult> {
        let mut table = self.database.get_table(&query.table)?.clone();
        self.trace(&table);

        for join in &query.joins {
            let right = self.database.get_table(&join.table)?;
            table = table.join(right, &join.key)?;
            self.trace(&table);
        }

        for condition in &query.conditions {
            table = table.filter(|record| condition.evaluate(record))?;
            if self.verbose {
                eprintln!("Applied condition {}", condition);
            }
            self.trace(&table);
        }

        match &query.finish {
            Finish::Table => Ok(QueryResult::Table(table)),
            Finish::Select(columns) => {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                let header = table
                    .columns()
                    .iter()
                    .filter(|column| columns.contains(&column.as_str()))
                    .cloned()
                    .collect();
                Ok(QueryResult::Records {
                    header,
                    records: table.select(&columns),
                })
            }
            Finish::Aggregate(specs) => {
                let mut scalars = Vec::with_capacity(specs.len());
                for spec in specs {
                    let value = table.aggregate(|values| spec.function.execute(values), &spec.column)?;
                    scalars.push((spec.label(), value));
                }
                Ok(QueryResult::Scalars(scalars))
            }
            Finish::Pivot {
                dimensions,
                aggregates,
            } => {
                let keys: Vec<&str> = dimensions.iter().map(String::as_str).collect();
                let rows = table.pivot(&keys, aggregates)?;
                if self.verbose {
                    eprintln!("Pivot produced {} groups", rows.len());
                }

                let header = dimensions
                    .iter()
                    .cloned()
                    .chain(aggregates.iter().map(|a| a.label().to_string()))
                    .collect();
                Ok(QueryResult::Pivot { header, rows })
            }
        }
    }

    fn trace(&self, table: &Table) {
        if self.verbose {
            eprintln!("Table '{}' has {} rows", table.name(), table.row_count());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database() -> Database {
        let mut db = Database::new();
        db.insert(Table::from_records(
            "cities",
            vec![
                [("city", "Rome"), ("country", "Italy"), ("temperature", "15.5")]
                    .into_iter()
                    .collect(),
                [("city", "Oslo"), ("country", "Norway"), ("temperature", "4.5")]
                    .into_iter()
                    .collect(),
                [("city", "Milan"), ("country", "Italy"), ("temperature", "13.5")]
                    .into_iter()
                    .collect(),
            ],
        ));
        db.insert(Table::from_records(
            "countries",
            vec![
                [("country", "Italy"), ("EU", "yes")].into_iter().collect(),
                [("country", "Norway"), ("EU", "no")].into_iter().collect(),
            ],
        ));
        db
    }

    fn query(finish: Finish) -> Query {
        Query {
            table: "cities".to_string(),
            joins: Vec::new(),
            conditions: Vec::new(),
            finish,
        }
    }

    #[test]
    fn test_parse_specs() {
        assert_eq!(
            JoinSpec::parse("countries:country").unwrap(),
            JoinSpec {
                table: "countries".to_string(),
                key: "country".to_string()
            }
        );
        assert!(JoinSpec::parse("countries").is_err());

        let agg = AggregateSpec::parse("avg:temperature").unwrap();
        assert_eq!(agg.function, AggregateFunction::Mean);
        assert_eq!(agg.label(), "mean(temperature)");
        assert!(AggregateSpec::parse("median:temperature").is_err());
        assert!(AggregateSpec::parse("sum:").is_err());

        assert_eq!(parse_pivot_value("count").unwrap().label(), "count");
        assert_eq!(parse_pivot_value("max:fare").unwrap().label(), "max(fare)");
    }

    #[test]
    fn test_join_then_filter() {
        let db = database();
        let mut q = query(Finish::Select(vec!["city".to_string()]));
        q.joins.push(JoinSpec::parse("countries:country").unwrap());
        q.conditions.push(Condition::parse("EU=no").unwrap());

        match QueryExecutor::new(&db, false).execute(&q).unwrap() {
            QueryResult::Records { header, records } => {
                let expected: Record = [("city", "Oslo")].into_iter().collect();
                assert_eq!(header, vec!["city"]);
                assert_eq!(records, vec![expected]);
            }
            other => panic!("Expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_aggregates() {
        let db = database();
        let mut q = query(Finish::Aggregate(vec![
            AggregateSpec::parse("mean:temperature").unwrap(),
            AggregateSpec::parse("count:city").unwrap(),
        ]));
        q.conditions.push(Condition::parse("country=Italy").unwrap());

        match QueryExecutor::new(&db, false).execute(&q).unwrap() {
            QueryResult::Scalars(scalars) => {
                assert_eq!(
                    scalars,
                    vec![
                        ("mean(temperature)".to_string(), Value::Number(14.5)),
                        ("count(city)".to_string(), Value::Number(2.0)),
                    ]
                );
            }
            other => panic!("Expected scalars, got {:?}", other),
        }
    }

    #[test]
    fn test_pivot_header() {
        let db = database();
        let q = query(Finish::Pivot {
            dimensions: vec!["country".to_string()],
            aggregates: vec![parse_pivot_value("count").unwrap()],
        });

        match QueryExecutor::new(&db, false).execute(&q).unwrap() {
            QueryResult::Pivot { header, rows } => {
                assert_eq!(header, vec!["country", "count"]);
                assert_eq!(rows.len(), 2);
            }
            other => panic!("Expected pivot, got {:?}", other),
        }
    }

    #[test]
    fn test_select_with_no_rows_keeps_header() {
        let db = database();
        let mut q = query(Finish::Select(vec![
            "temperature".to_string(),
            "city".to_string(),
            "population".to_string(),
        ]));
        q.conditions.push(Condition::parse("country=Atlantis").unwrap());

        match QueryExecutor::new(&db, false).execute(&q).unwrap() {
            QueryResult::Records { header, records } => {
                assert_eq!(header, vec!["city", "temperature"]);
                assert!(records.is_empty());
            }
            other => panic!("Expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_table() {
        let db = database();
        let mut q = query(Finish::Table);
        q.table = "teams".to_string();

        assert!(matches!(
            QueryExecutor::new(&db, false).execute(&q),
            Err(TabqlError::TableNotFound(_))
        ));
    }
}
