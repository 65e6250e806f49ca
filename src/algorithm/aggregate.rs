//! Group-by counting over registry tables
//!
//! Counts are keyed by [`GroupValue`], which covers both the integer code
//! columns and the text columns of the prepared schema. Null cells are never
//! counted. Results come back sorted ascending by key.

use std::fmt;
use std::ops::RangeInclusive;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::error::{RegistryError, Result};
use crate::utils::arrow::{column_by_name, downcast_array, int64_column};

/// Longest year span a time series will zero-fill
pub const MAX_PERIOD_SPAN: i64 = 500;

/// A grouping key taken from one cell of a table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    /// Integer code or year
    Int(i64),
    /// Text label
    Text(String),
}

impl GroupValue {
    /// The integer payload, if this is an integer key
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for GroupValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for GroupValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One key per row of `column`, `None` for null cells
pub fn group_values(batch: &RecordBatch, column: &str) -> Result<Vec<Option<GroupValue>>> {
    let array = column_by_name(batch, column)?;
    match array.data_type() {
        DataType::Int64 => {
            let values = downcast_array::<Int64Array>(array, column, "Int64")?;
            Ok(values.iter().map(|v| v.map(GroupValue::Int)).collect())
        }
        DataType::Utf8 => {
            let values = downcast_array::<StringArray>(array, column, "Utf8")?;
            Ok(values
                .iter()
                .map(|v| v.map(|s| GroupValue::Text(s.to_string())))
                .collect())
        }
        other => Err(RegistryError::data_format(format!(
            "Column '{column}' has type {other}, which cannot be grouped"
        ))),
    }
}

/// Count rows per distinct value of `column`
pub fn count_by(batch: &RecordBatch, column: &str) -> Result<Vec<(GroupValue, u64)>> {
    let mut counts: FxHashMap<GroupValue, u64> = FxHashMap::default();
    for value in group_values(batch, column)?.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }
    Ok(counts.into_iter().sorted().collect())
}

/// Count rows per distinct `(first, second)` combination
pub fn count_by_pair(
    batch: &RecordBatch,
    first: &str,
    second: &str,
) -> Result<Vec<((GroupValue, GroupValue), u64)>> {
    let firsts = group_values(batch, first)?;
    let seconds = group_values(batch, second)?;

    let mut counts: FxHashMap<(GroupValue, GroupValue), u64> = FxHashMap::default();
    for pair in firsts.into_iter().zip(seconds) {
        if let (Some(a), Some(b)) = pair {
            *counts.entry((a, b)).or_insert(0) += 1;
        }
    }
    Ok(counts.into_iter().sorted().collect())
}

/// Range spanned by an integer period column, `None` when it holds no values
///
/// # Errors
/// Returns `DataFormat` when the span exceeds [`MAX_PERIOD_SPAN`] years.
pub fn period_domain(batch: &RecordBatch, column: &str) -> Result<Option<RangeInclusive<i64>>> {
    let periods = int64_column(batch, column)?;
    let (Some(min), Some(max)) = (arrow::compute::min(periods), arrow::compute::max(periods))
    else {
        return Ok(None);
    };

    if max.abs_diff(min) > MAX_PERIOD_SPAN.unsigned_abs() {
        return Err(RegistryError::data_format(format!(
            "Column '{column}' spans {min}..={max}, too wide for a time series"
        )));
    }
    Ok(Some(min..=max))
}

/// Expand integer-keyed counts so every period of `domain` is present
///
/// Periods without a count appear with zero.
#[must_use]
pub fn zero_fill(counts: &[(GroupValue, u64)], domain: RangeInclusive<i64>) -> Vec<(GroupValue, u64)> {
    let lookup: FxHashMap<i64, u64> = counts
        .iter()
        .filter_map(|(key, count)| key.as_int().map(|k| (k, *count)))
        .collect();

    domain
        .map(|period| (GroupValue::Int(period), lookup.get(&period).copied().unwrap_or(0)))
        .collect()
}
