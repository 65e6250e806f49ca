//! Row filtering for registry tables
//!
//! Filters are expressions evaluated into boolean masks over a record batch;
//! the year filter used by most reports is a thin wrapper around them.

pub mod core;
pub mod expr;

use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::schema::YEAR;

pub use self::core::{BatchFilter, filter_record_batch};
pub use self::expr::{Expr, LiteralValue, evaluate_expr};

/// Rows of the prepared table recorded in `year`
///
/// An empty result is valid when no row matches.
pub fn filter_year(batch: &RecordBatch, year: i64) -> Result<RecordBatch> {
    Expr::eq_int(YEAR, year).filter(batch)
}
