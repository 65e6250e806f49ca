//! Expression-based filtering for registry tables
//!
//! This module provides an expression-based filtering system that
//! allows filtering Arrow record batches based on column values.

use std::collections::HashSet;
use std::fmt;

use arrow::array::{Array, BooleanArray, Int64Array, StringArray};
use arrow::compute::kernels::cmp::{distinct, eq};
use arrow::compute::{and, not, or};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{RegistryError, Result};
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::utils::arrow::column_by_name;

/// Represents a filter expression over a registry table
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column equals a literal value; null cells never match
    Eq(String, LiteralValue),

    /// Column differs from a literal value; null cells count as different
    NotEq(String, LiteralValue),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Integer value
    Int(i64),

    /// String value
    String(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "'{s}'"),
        }
    }
}

impl Expr {
    /// `column == value` for an integer column
    pub fn eq_int(column: &str, value: i64) -> Self {
        Self::Eq(column.to_string(), LiteralValue::Int(value))
    }

    /// `column == value` for a text column
    pub fn eq_str(column: &str, value: impl Into<String>) -> Self {
        Self::Eq(column.to_string(), LiteralValue::String(value.into()))
    }

    /// `column != value` for an integer column
    pub fn not_eq_int(column: &str, value: i64) -> Self {
        Self::NotEq(column.to_string(), LiteralValue::Int(value))
    }

    /// Conjunction of `exprs`, collapsing trivial cases
    #[must_use]
    pub fn all(mut exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Self::AlwaysTrue,
            1 => exprs.remove(0),
            _ => Self::And(exprs),
        }
    }

    /// Returns a set of all column names required by this expression
    #[must_use]
    pub fn columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_required_columns(&mut columns);
        columns
    }

    fn collect_required_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::Eq(col, _) | Self::NotEq(col, _) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
            Self::Not(expr) => expr.collect_required_columns(columns),
            Self::AlwaysTrue => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(col, value) => write!(f, "{col} == {value}"),
            Self::NotEq(col, value) => write!(f, "{col} != {value}"),
            Self::And(exprs) | Self::Or(exprs) => {
                let joiner = if matches!(self, Self::And(_)) { " AND " } else { " OR " };
                let parts: Vec<String> = exprs.iter().map(|e| format!("({e})")).collect();
                write!(f, "{}", parts.join(joiner))
            }
            Self::Not(expr) => write!(f, "NOT ({expr})"),
            Self::AlwaysTrue => write!(f, "TRUE"),
        }
    }
}

impl BatchFilter for Expr {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        if matches!(self, Self::AlwaysTrue) {
            return Ok(batch.clone());
        }
        let mask = evaluate_expr(batch, self)?;
        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        self.columns()
    }
}

/// Evaluates a filter expression against a record batch
///
/// # Returns
/// A boolean array indicating which rows match the filter
///
/// # Errors
/// Returns an error if a column is missing or the literal type does not
/// match the column type
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; batch.num_rows()])),
        Expr::Eq(col_name, literal) => evaluate_comparison(batch, col_name, literal, false),
        Expr::NotEq(col_name, literal) => evaluate_comparison(batch, col_name, literal, true),
        Expr::And(exprs) => evaluate_fold(batch, exprs, true),
        Expr::Or(exprs) => evaluate_fold(batch, exprs, false),
        Expr::Not(inner) => {
            let mask = evaluate_expr(batch, inner)?;
            Ok(not(&mask)?)
        }
    }
}

/// Combine sub-expressions with AND (`conjunction`) or OR
fn evaluate_fold(batch: &RecordBatch, exprs: &[Expr], conjunction: bool) -> Result<BooleanArray> {
    let Some((first, rest)) = exprs.split_first() else {
        return Ok(BooleanArray::from(vec![conjunction; batch.num_rows()]));
    };

    let mut result = evaluate_expr(batch, first)?;
    for expr in rest {
        let mask = evaluate_expr(batch, expr)?;
        result = if conjunction {
            and(&result, &mask)?
        } else {
            or(&result, &mask)?
        };
    }
    Ok(result)
}

fn evaluate_comparison(
    batch: &RecordBatch,
    col_name: &str,
    literal: &LiteralValue,
    negate: bool,
) -> Result<BooleanArray> {
    let column = column_by_name(batch, col_name)?;

    // `distinct` treats null as a value of its own, so nulls survive a NotEq
    let result = match (column.data_type(), literal) {
        (DataType::Int64, LiteralValue::Int(n)) => {
            let scalar = Int64Array::new_scalar(*n);
            if negate {
                distinct(column, &scalar)?
            } else {
                eq(column, &scalar)?
            }
        }
        (DataType::Utf8, LiteralValue::String(s)) => {
            let scalar = StringArray::new_scalar(s);
            if negate {
                distinct(column, &scalar)?
            } else {
                eq(column, &scalar)?
            }
        }
        (data_type, literal) => {
            return Err(RegistryError::data_format(format!(
                "Cannot compare column '{col_name}' of type {data_type} with literal {literal}"
            )));
        }
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};

    use super::*;

    fn batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("age", DataType::Int64, true),
            Field::new("breed", DataType::Utf8, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(vec![Some(30), Some(999), None, Some(45)])),
                Arc::new(StringArray::from(vec![
                    Some("Labrador"),
                    Some("Pudel"),
                    Some("Labrador"),
                    None,
                ])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_not_eq_keeps_nulls() {
        let filtered = Expr::not_eq_int("age", 999).filter(&batch()).unwrap();
        assert_eq!(filtered.num_rows(), 3);
    }

    #[test]
    fn test_eq_drops_nulls() {
        let filtered = Expr::eq_str("breed", "Labrador").filter(&batch()).unwrap();
        assert_eq!(filtered.num_rows(), 2);
    }

    #[test]
    fn test_combinators() {
        let expr = Expr::all(vec![
            Expr::eq_str("breed", "Labrador"),
            Expr::not_eq_int("age", 999),
        ]);
        assert_eq!(expr.filter(&batch()).unwrap().num_rows(), 2);

        let expr = Expr::Or(vec![Expr::eq_int("age", 30), Expr::eq_int("age", 45)]);
        assert_eq!(expr.filter(&batch()).unwrap().num_rows(), 2);

        let expr = Expr::Not(Box::new(Expr::eq_int("age", 30)));
        // NOT(null) stays null, so the null-age row is dropped too
        assert_eq!(expr.filter(&batch()).unwrap().num_rows(), 2);

        assert_eq!(Expr::all(vec![]), Expr::AlwaysTrue);
        assert_eq!(Expr::AlwaysTrue.filter(&batch()).unwrap().num_rows(), 4);
    }

    #[test]
    fn test_type_mismatch_is_format_error() {
        let result = Expr::eq_int("breed", 1).filter(&batch());
        assert!(matches!(result, Err(RegistryError::DataFormat(_))));
    }

    #[test]
    fn test_required_columns() {
        let expr = Expr::all(vec![Expr::eq_int("age", 1), Expr::eq_str("breed", "x")]);
        let columns = expr.required_columns();
        assert!(columns.contains("age") && columns.contains("breed"));
        assert!(expr.check_columns(&batch()).is_ok());
        assert!(Expr::eq_int("district", 1).check_columns(&batch()).is_err());
    }
}
