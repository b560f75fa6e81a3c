//! Aggregate function module for tabql
//!
//! The engine itself has no built-in reducers: `Table::aggregate` accepts any
//! function over a sequence of values. This module provides the common ones
//! (count, sum, mean, min, max) so callers and the command line don't have to
//! write them by hand.
//!
//! All reducers fail fast. An empty group is an error for mean, min and max,
//! and a non-numeric value is an error for sum and mean.

use crate::error::{TabqlError, TabqlResult};
use crate::table::Value;

/// Built-in reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    /// COUNT - number of values, numeric or not
    Count,
    /// SUM - total of numeric values
    Sum,
    /// MEAN - arithmetic mean of numeric values
    Mean,
    /// MIN - smallest value
    Min,
    /// MAX - largest value
    Max,
}

impl AggregateFunction {
    /// Convert a function name string to an AggregateFunction enum
    ///
    /// # Arguments
    /// * `name` - The function name (case-insensitive); `len` and `avg` are
    ///   accepted as aliases of `count` and `mean`
    ///
    /// # Returns
    /// * Some(AggregateFunction) if the name is known, None otherwise
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "count" | "len" => Some(AggregateFunction::Count),
            "sum" => Some(AggregateFunction::Sum),
            "mean" | "avg" => Some(AggregateFunction::Mean),
            "min" => Some(AggregateFunction::Min),
            "max" => Some(AggregateFunction::Max),
            _ => None,
        }
    }

    /// Lowercase name of the function, used for output labels
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Mean => "mean",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        }
    }

    /// Execute the aggregate function on a column of values
    ///
    /// # Arguments
    /// * `values` - The column values to aggregate
    ///
    /// # Returns
    /// * The result of the aggregate function
    pub fn execute(&self, values: &[Value]) -> TabqlResult<Value> {
        match self {
            AggregateFunction::Count => Ok(Value::Number(values.len() as f64)),
            AggregateFunction::Sum => self.sum(values).map(Value::Number),
            AggregateFunction::Mean => self.mean(values),
            AggregateFunction::Min => self.extreme(values, |candidate, best| candidate < best),
            AggregateFunction::Max => self.extreme(values, |candidate, best| candidate > best),
        }
    }

    /// SUM function implementation
    ///
    /// The sum of an empty sequence is zero.
    fn sum(&self, values: &[Value]) -> TabqlResult<f64> {
        let mut total = 0.0;
        for value in values {
            match value {
                Value::Number(n) => total += n,
                Value::Text(s) => {
                    return Err(TabqlError::TypeError(format!(
                        "{}() cannot use non-numeric value '{}'",
                        self.name(),
                        s
                    )))
                }
            }
        }
        Ok(total)
    }

    /// MEAN function implementation
    fn mean(&self, values: &[Value]) -> TabqlResult<Value> {
        let total = self.sum(values)?;
        if values.is_empty() {
            return Err(TabqlError::DivideByZero);
        }
        Ok(Value::Number(total / values.len() as f64))
    }

    /// Shared MIN/MAX implementation
    ///
    /// Keeps the first value for which no later value is preferred, so ties
    /// resolve to the earliest row.
    fn extreme<F>(&self, values: &[Value], prefer: F) -> TabqlResult<Value>
    where
        F: Fn(&Value, &Value) -> bool,
    {
        let (first, rest) = values
            .split_first()
            .ok_or_else(|| TabqlError::EmptyGroup(self.name().to_string()))?;

        let mut best = first;
        for value in rest {
            if prefer(value, best) {
                best = value;
            }
        }

        Ok(best.clone())
    }
}
