//! Pivot engine for tabql
//!
//! A pivot groups a table by one or more dimension columns and computes a set
//! of aggregates for every group. Groups are the full cross product of the
//! distinct values of each dimension, so a pivot over `class` and `gender`
//! produces one row for every (class, gender) pair even when no source row
//! carries that pair.
//!
//! Every aggregate runs for every group, including empty ones. A reducer that
//! cannot handle an empty group (mean, min, max) fails the whole pivot.

use std::fmt;

use crate::aggregate::AggregateFunction;
use crate::combination::combinations;
use crate::error::TabqlResult;
use crate::record::Record;
use crate::table::{Table, Value};

/// Reducer over the coerced values of one column
pub type FieldReducer = Box<dyn Fn(&[Value]) -> TabqlResult<Value>>;

/// Reducer over the grouped records themselves
pub type RowReducer = Box<dyn Fn(&[Record]) -> TabqlResult<Value>>;

/// One output column of a pivot
pub enum PivotAggregate {
    /// Aggregate one column of each group through `Table::aggregate`
    Field {
        /// Column to aggregate
        key: String,
        /// Output column label
        label: String,
        /// Reducer applied to the column values
        reducer: FieldReducer,
    },
    /// Apply a reducer to the records of each group, regardless of columns
    Rows {
        /// Output column label
        label: String,
        /// Reducer applied to the group's records
        reducer: RowReducer,
    },
}

impl PivotAggregate {
    /// Aggregate a column with a built-in function, labelled `func(key)`
    pub fn field(key: &str, function: AggregateFunction) -> Self {
        PivotAggregate::Field {
            key: key.to_string(),
            label: format!("{}({})", function.name(), key),
            reducer: Box::new(move |values: &[Value]| function.execute(values)),
        }
    }

    /// Aggregate a column with a caller-supplied reducer
    pub fn field_with<F>(key: &str, label: &str, reducer: F) -> Self
    where
        F: Fn(&[Value]) -> TabqlResult<Value> + 'static,
    {
        PivotAggregate::Field {
            key: key.to_string(),
            label: label.to_string(),
            reducer: Box::new(reducer),
        }
    }

    /// Reduce the records of each group with a caller-supplied function
    pub fn rows<F>(label: &str, reducer: F) -> Self
    where
        F: Fn(&[Record]) -> TabqlResult<Value> + 'static,
    {
        PivotAggregate::Rows {
            label: label.to_string(),
            reducer: Box::new(reducer),
        }
    }

    /// Number of records in each group, labelled `count`
    pub fn row_count() -> Self {
        PivotAggregate::rows("count", |records| Ok(Value::Number(records.len() as f64)))
    }

    /// Output column label
    pub fn label(&self) -> &str {
        match self {
            PivotAggregate::Field { label, .. } | PivotAggregate::Rows { label, .. } => label,
        }
    }

    /// Compute this aggregate for one group
    fn evaluate(&self, group: &Table) -> TabqlResult<Value> {
        match self {
            PivotAggregate::Field { key, reducer, .. } => {
                group.aggregate(|values| reducer(values), key)
            }
            PivotAggregate::Rows { reducer, .. } => reducer(group.records()),
        }
    }
}

impl fmt::Debug for PivotAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotAggregate::Field { key, label, .. } => f
                .debug_struct("Field")
                .field("key", key)
                .field("label", label)
                .finish_non_exhaustive(),
            PivotAggregate::Rows { label, .. } => f
                .debug_struct("Rows")
                .field("label", label)
                .finish_non_exhaustive(),
        }
    }
}

/// One row of pivot output
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    /// Dimension values identifying the group, in dimension order
    pub keys: Vec<String>,
    /// Aggregate results, in the order the aggregates were given
    pub values: Vec<Value>,
}

impl PivotRow {
    /// All cells of the row: dimension values followed by aggregate results
    pub fn cells(&self) -> Vec<Value> {
        self.keys
            .iter()
            .map(|key| Value::Text(key.clone()))
            .chain(self.values.iter().cloned())
            .collect()
    }
}

impl Table {
    /// Build a pivot over this table
    ///
    /// # Arguments
    /// * `dimension_keys` - Columns to group by, in output order
    /// * `aggregates` - Output aggregates, in output order
    ///
    /// # Returns
    /// * One row per combination of distinct dimension values, in sorted
    ///   odometer order (last dimension varying fastest)
    /// * `Err` if a record lacks a dimension or aggregated column, or if any
    ///   reducer fails for any group
    pub fn pivot(
        &self,
        dimension_keys: &[&str],
        aggregates: &[PivotAggregate],
    ) -> TabqlResult<Vec<PivotRow>> {
        let dimensions = dimension_keys
            .iter()
            .map(|key| self.distinct_values(key))
            .collect::<TabqlResult<Vec<_>>>()?;

        let mut rows = Vec::new();

        for combination in combinations(&dimensions) {
            let group = self.filter(|record| {
                for (key, expected) in dimension_keys.iter().zip(&combination) {
                    if record.get(key)? != expected.as_str() {
                        return Ok(false);
                    }
                }
                Ok(true)
            })?;

            let values = aggregates
                .iter()
                .map(|aggregate| aggregate.evaluate(&group))
                .collect::<TabqlResult<Vec<_>>>()?;

            rows.push(PivotRow {
                keys: combination,
                values,
            });
        }

        Ok(rows)
    }

    /// Build a pivot and return it as a table named `<name>_pivot`
    ///
    /// Columns are the dimension keys followed by the aggregate labels.
    pub fn pivot_table(
        &self,
        dimension_keys: &[&str],
        aggregates: &[PivotAggregate],
    ) -> TabqlResult<Table> {
        let rows = self.pivot(dimension_keys, aggregates)?;

        let records = rows
            .into_iter()
            .map(|row| {
                let mut record = Record::new();
                for (key, value) in dimension_keys.iter().zip(row.keys) {
                    record.insert(*key, value);
                }
                for (aggregate, value) in aggregates.iter().zip(row.values) {
                    record.insert(aggregate.label(), value.to_string());
                }
                record
            })
            .collect();

        let columns = dimension_keys
            .iter()
            .map(|key| key.to_string())
            .chain(aggregates.iter().map(|aggregate| aggregate.label().to_string()))
            .collect();

        Ok(Table::with_columns(
            &format!("{}_pivot", self.name()),
            columns,
            records,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabqlError;

    fn passenger(class: &str, gender: &str, fare: &str) -> Record {
        [("class", class), ("gender", gender), ("fare", fare)]
            .into_iter()
            .collect()
    }

    fn titanic() -> Table {
        Table::from_records(
            "titanic",
            vec![
                passenger("1", "F", "80"),
                passenger("3", "M", "8"),
                passenger("1", "M", "60"),
                passenger("2", "F", "20"),
                passenger("3", "M", "7"),
                passenger("3", "F", "9"),
            ],
        )
    }

    #[test]
    fn test_single_dimension_has_one_row_per_value() {
        let rows = titanic()
            .pivot(&["class"], &[PivotAggregate::row_count()])
            .unwrap();

        assert_eq!(rows.len(), 3);
        let keys: Vec<&str> = rows.iter().map(|r| r.keys[0].as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "3"]);
        let counts: Vec<Value> = rows.iter().map(|r| r.values[0].clone()).collect();
        assert_eq!(
            counts,
            vec![Value::Number(2.0), Value::Number(1.0), Value::Number(3.0)]
        );
    }

    #[test]
    fn test_aggregates_follow_declared_order() {
        let rows = titanic()
            .pivot(
                &["class"],
                &[
                    PivotAggregate::field("fare", AggregateFunction::Max),
                    PivotAggregate::field("fare", AggregateFunction::Sum),
                ],
            )
            .unwrap();

        assert_eq!(
            rows[2].cells(),
            vec![
                Value::Text("3".to_string()),
                Value::Number(9.0),
                Value::Number(24.0),
            ]
        );
    }

    #[test]
    fn test_full_cross_product_includes_empty_groups() {
        let rows = titanic()
            .pivot(
                &["class", "gender"],
                &[
                    PivotAggregate::row_count(),
                    PivotAggregate::field("fare", AggregateFunction::Sum),
                ],
            )
            .unwrap();

        assert_eq!(rows.len(), 6);
        let two_male = rows
            .iter()
            .find(|r| r.keys == vec!["2".to_string(), "M".to_string()])
            .unwrap();
        assert_eq!(two_male.values, vec![Value::Number(0.0), Value::Number(0.0)]);
    }

    #[test]
    fn test_empty_group_fails_whole_pivot() {
        let result = titanic().pivot(
            &["class", "gender"],
            &[PivotAggregate::field("fare", AggregateFunction::Mean)],
        );

        assert!(matches!(result, Err(TabqlError::DivideByZero)));
    }

    #[test]
    fn test_missing_dimension_is_lookup_error() {
        let result = titanic().pivot(&["deck"], &[PivotAggregate::row_count()]);
        assert!(matches!(result, Err(TabqlError::ColumnNotFound(ref c)) if c == "deck"));
    }

    #[test]
    fn test_missing_aggregated_column_fails_whole_pivot() {
        let result = titanic().pivot(
            &["class"],
            &[
                PivotAggregate::row_count(),
                PivotAggregate::field("missing", AggregateFunction::Sum),
            ],
        );

        assert!(matches!(result, Err(TabqlError::ColumnNotFound(ref c)) if c == "missing"));
    }

    #[test]
    fn test_custom_reducers() {
        let cheap_fares = PivotAggregate::rows("cheap", |records| {
            let cheap = records
                .iter()
                .filter(|r| {
                    r.get("fare")
                        .map(|fare| fare.parse::<f64>().unwrap_or(0.0) < 10.0)
                        .unwrap_or(false)
                })
                .count();
            Ok(Value::Number(cheap as f64))
        });
        let spread = PivotAggregate::field_with("fare", "spread", |values| {
            let max = AggregateFunction::Max.execute(values)?.as_f64().unwrap_or(0.0);
            let min = AggregateFunction::Min.execute(values)?.as_f64().unwrap_or(0.0);
            Ok(Value::Number(max - min))
        });

        let rows = titanic().pivot(&["gender"], &[cheap_fares, spread]).unwrap();

        assert_eq!(rows[0].keys, vec!["F".to_string()]);
        assert_eq!(rows[0].values, vec![Value::Number(1.0), Value::Number(71.0)]);
        assert_eq!(rows[1].values, vec![Value::Number(2.0), Value::Number(53.0)]);
    }

    #[test]
    fn test_pivot_table_columns() {
        let table = titanic()
            .pivot_table(
                &["gender"],
                &[
                    PivotAggregate::row_count(),
                    PivotAggregate::field("fare", AggregateFunction::Mean),
                ],
            )
            .unwrap();

        assert_eq!(table.name(), "titanic_pivot");
        assert_eq!(table.columns(), vec!["gender", "count", "mean(fare)"]);
        assert_eq!(table.records()[1].get("mean(fare)").unwrap(), "25");
    }
}
