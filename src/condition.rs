//! Row conditions for the tabql command line
//!
//! The engine filters with arbitrary predicates. On the command line those
//! predicates are written as simple `column OP value` expressions, for
//! example `country=Italy`, `temperature<5.0` or `team~ia`. This module parses
//! them and evaluates them against records.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;

use crate::error::{TabqlError, TabqlResult};
use crate::record::Record;

/// Pattern for `column OP value`; the operator is the first one found
const CONDITION_PATTERN: &str = r"^\s*([^=!<>~]+?)\s*(==|!=|<=|>=|=|<|>|~)\s*(.*?)\s*$";

/// Comparison operators supported in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=` or `==`: exact string equality
    Eq,
    /// `!=`: exact string inequality
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `~`: the column value contains the operand
    Contains,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" | "==" => Some(Operator::Eq),
            "!=" => Some(Operator::NotEq),
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::LtEq),
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::GtEq),
            "~" => Some(Operator::Contains),
            _ => None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Contains => "~",
        }
    }
}

/// A single `column OP value` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Column the condition reads
    pub column: String,
    /// Comparison operator
    pub operator: Operator,
    /// Literal right-hand side
    pub operand: String,
}

impl Condition {
    /// Parse a condition expression
    ///
    /// # Returns
    /// * `Err(TabqlError::InvalidExpression)` if the text has no column or no
    ///   recognised operator
    pub fn parse(expression: &str) -> TabqlResult<Self> {
        let pattern =
            Regex::new(CONDITION_PATTERN).map_err(|e| TabqlError::InvalidExpression(e.to_string()))?;

        let captures = pattern.captures(expression).ok_or_else(|| {
            TabqlError::InvalidExpression(format!(
                "'{}' is not of the form column OP value",
                expression
            ))
        })?;

        let operator = Operator::from_symbol(&captures[2])
            .ok_or_else(|| TabqlError::InvalidExpression(expression.to_string()))?;

        Ok(Condition {
            column: captures[1].to_string(),
            operator,
            operand: captures[3].to_string(),
        })
    }

    /// Evaluate the condition against a record
    ///
    /// Ordering operators compare numerically when both sides parse as
    /// numbers and lexicographically otherwise.
    ///
    /// # Returns
    /// * `Err(TabqlError::ColumnNotFound)` if the record lacks the column
    pub fn evaluate(&self, record: &Record) -> TabqlResult<bool> {
        let value = record.get(&self.column)?;
        let operand = self.operand.as_str();

        Ok(match self.operator {
            Operator::Eq => value == operand,
            Operator::NotEq => value != operand,
            Operator::Contains => value.contains(operand),
            Operator::Lt => compare(value, operand) == Some(Ordering::Less),
            Operator::LtEq => matches!(compare(value, operand), Some(Ordering::Less | Ordering::Equal)),
            Operator::Gt => compare(value, operand) == Some(Ordering::Greater),
            Operator::GtEq => {
                matches!(compare(value, operand), Some(Ordering::Greater | Ordering::Equal))
            }
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.operator.symbol(), self.operand)
    }
}

fn compare(left: &str, right: &str) -> Option<Ordering> {
    match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r),
        _ => Some(left.cmp(right)),
    }
}
