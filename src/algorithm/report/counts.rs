//! Single-key count reports: histograms and time series.

use std::ops::RangeInclusive;

use arrow::record_batch::RecordBatch;

use crate::algorithm::aggregate::{GroupValue, count_by, zero_fill};
use crate::error::Result;

/// Rows per distinct value of `column`, ascending by value
///
/// An empty table yields an empty histogram.
pub fn frequency(rows: &RecordBatch, column: &str) -> Result<Vec<(GroupValue, u64)>> {
    count_by(rows, column)
}

/// Rows per period
///
/// With a `domain`, every period in it is present and periods without rows
/// count zero. Without one (the source table had no periods at all) the
/// series is empty.
pub fn time_series(
    rows: &RecordBatch,
    period_column: &str,
    domain: Option<RangeInclusive<i64>>,
) -> Result<Vec<(GroupValue, u64)>> {
    let counts = count_by(rows, period_column)?;
    Ok(match domain {
        Some(domain) => zero_fill(&counts, domain),
        None => counts,
    })
}
