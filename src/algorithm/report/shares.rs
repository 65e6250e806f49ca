//! Percentage breakdowns
//!
//! Covers the breed distribution (shares above a threshold kept, the rest
//! folded into one bucket) and the per-year owner gender split.

use std::ops::RangeInclusive;

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use super::CodeLabel;
use crate::algorithm::aggregate::{count_by, count_by_pair};
use crate::error::{RegistryError, Result};
use crate::utils::log_warning;

/// One labelled percentage
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    /// Value or bucket label
    pub label: String,
    /// Percentage of the total, 0 to 100
    pub percentage: f64,
}

/// Result of a share computation
#[derive(Debug, Clone, PartialEq)]
pub struct ShareBreakdown {
    /// Kept values by descending percentage, then the folded bucket if any
    pub shares: Vec<Share>,
    /// Number of distinct values folded into the bucket
    pub folded: usize,
    /// Rows the percentages are computed over
    pub total: u64,
}

impl ShareBreakdown {
    /// Sum of all percentages, 100 up to rounding for a non-empty input
    #[must_use]
    pub fn percentage_sum(&self) -> f64 {
        self.shares.iter().map(|s| s.percentage).sum()
    }

    /// Percentage of a label, if present
    #[must_use]
    pub fn percentage_of(&self, label: &str) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.percentage)
    }
}

/// Percentage of rows per value of `column`
///
/// Values whose share is strictly greater than `threshold_pct` are kept; the
/// others are summed into a single share labelled `other_label`, which is
/// only present when something was folded.
///
/// # Errors
/// Returns `EmptyDataset` when there are no non-null values to share out.
pub fn share_breakdown(
    rows: &RecordBatch,
    column: &str,
    threshold_pct: f64,
    other_label: &str,
) -> Result<ShareBreakdown> {
    let counts = count_by(rows, column)?;
    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Err(RegistryError::empty_dataset(format!(
            "no '{column}' values to compute percentages over"
        )));
    }

    let (kept, folded): (Vec<Share>, Vec<Share>) = counts
        .into_iter()
        .map(|(value, count)| Share {
            label: value.to_string(),
            percentage: count as f64 / total as f64 * 100.0,
        })
        .partition(|share| share.percentage > threshold_pct);

    let mut shares: Vec<Share> = kept
        .into_iter()
        .sorted_by(|a, b| {
            b.percentage
                .total_cmp(&a.percentage)
                .then_with(|| a.label.cmp(&b.label))
        })
        .collect();

    if !folded.is_empty() {
        shares.push(Share {
            label: other_label.to_string(),
            percentage: folded.iter().map(|s| s.percentage).sum(),
        });
    }

    Ok(ShareBreakdown {
        shares,
        folded: folded.len(),
        total,
    })
}

/// Counts of the two codes in one period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodShare {
    /// Period (year)
    pub period: i64,
    /// Rows with the first code
    pub first: u64,
    /// Rows with the second code
    pub second: u64,
}

impl PeriodShare {
    /// Denominator of the split: rows carrying either code
    #[must_use]
    pub fn total(&self) -> u64 {
        self.first + self.second
    }

    /// Percentage of the first code, `None` if neither code occurs
    #[must_use]
    pub fn first_percentage(&self) -> Option<f64> {
        self.percentage(self.first)
    }

    /// Percentage of the second code, `None` if neither code occurs
    #[must_use]
    pub fn second_percentage(&self) -> Option<f64> {
        self.percentage(self.second)
    }

    fn percentage(&self, count: u64) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| count as f64 / total as f64 * 100.0)
    }
}

/// Two-code split per period
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryShareSeries {
    /// First code and its label
    pub first: CodeLabel,
    /// Second code and its label
    pub second: CodeLabel,
    /// One entry per period, ascending
    pub periods: Vec<PeriodShare>,
    /// Rows carrying any other code; they are outside every denominator
    pub excluded: u64,
}

/// Per-period percentage of `first` and `second` among rows with either code
///
/// Rows with any other code are left out of the denominator and only
/// counted in [`BinaryShareSeries::excluded`]. When `domain` is given every
/// period in it is reported, including periods with no rows.
///
/// # Errors
/// Returns `EmptyDataset` when no row carries either code.
pub fn binary_share(
    rows: &RecordBatch,
    period_column: &str,
    code_column: &str,
    first: &CodeLabel,
    second: &CodeLabel,
    domain: Option<RangeInclusive<i64>>,
) -> Result<BinaryShareSeries> {
    let mut per_period: FxHashMap<i64, PeriodShare> = FxHashMap::default();
    let mut excluded = 0;

    for ((period, code), count) in count_by_pair(rows, period_column, code_column)? {
        let (Some(period), Some(code)) = (period.as_int(), code.as_int()) else {
            return Err(RegistryError::data_format(format!(
                "'{period_column}' and '{code_column}' must be integer columns"
            )));
        };
        let entry = per_period.entry(period).or_insert(PeriodShare {
            period,
            first: 0,
            second: 0,
        });
        if code == first.code {
            entry.first += count;
        } else if code == second.code {
            entry.second += count;
        } else {
            excluded += count;
        }
    }

    if per_period.values().all(|p| p.total() == 0) {
        return Err(RegistryError::empty_dataset(format!(
            "no rows with code {} or {} in '{code_column}'",
            first.code, second.code
        )));
    }

    if excluded > 0 {
        log_warning(
            &format!(
                "{excluded} rows carry a code other than {} or {} and are left out of the percentages",
                first.code, second.code
            ),
            Some(code_column),
        );
    }

    let periods: Vec<PeriodShare> = match domain {
        Some(domain) => domain
            .map(|period| {
                per_period.get(&period).copied().unwrap_or(PeriodShare {
                    period,
                    first: 0,
                    second: 0,
                })
            })
            .collect(),
        None => per_period
            .into_values()
            .sorted_by_key(|p| p.period)
            .collect(),
    };

    Ok(BinaryShareSeries {
        first: first.clone(),
        second: second.clone(),
        periods,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    use super::*;

    fn breeds(values: &[&str]) -> RecordBatch {
        let schema = Schema::new(vec![Field::new("breed", DataType::Utf8, true)]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(StringArray::from(values.to_vec()))],
        )
        .unwrap()
    }

    fn genders(years: &[i64], codes: &[i64]) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("year", DataType::Int64, true),
            Field::new("gender", DataType::Int64, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(years.to_vec())),
                Arc::new(Int64Array::from(codes.to_vec())),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_even_split_has_no_other_bucket() {
        let breakdown =
            share_breakdown(&breeds(&["Labrador", "Pudel"]), "breed", 1.0, "Other").unwrap();
        assert_eq!(breakdown.folded, 0);
        assert_eq!(breakdown.percentage_of("Labrador"), Some(50.0));
        assert_eq!(breakdown.percentage_of("Pudel"), Some(50.0));
        assert_eq!(breakdown.percentage_of("Other"), None);
    }

    #[test]
    fn test_small_breeds_are_folded() {
        let mut values = vec!["Labrador"; 150];
        values.push("Mops");
        values.push("Beagle");
        let breakdown = share_breakdown(&breeds(&values), "breed", 1.0, "Other").unwrap();

        assert_eq!(breakdown.folded, 2);
        assert_eq!(breakdown.shares.len(), 2);
        assert_eq!(breakdown.shares[0].label, "Labrador");
        assert_eq!(breakdown.shares[1].label, "Other");
        assert!((breakdown.percentage_sum() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_exact_threshold_is_folded() {
        // 1 of 100 rows is exactly 1%, which is not above the threshold
        let mut values = vec!["Labrador"; 99];
        values.push("Mops");
        let breakdown = share_breakdown(&breeds(&values), "breed", 1.0, "Other").unwrap();
        assert_eq!(breakdown.percentage_of("Mops"), None);
        assert_eq!(breakdown.percentage_of("Other"), Some(1.0));
    }

    #[test]
    fn test_empty_share_is_error() {
        let result = share_breakdown(&breeds(&[]), "breed", 1.0, "Other");
        assert!(matches!(result, Err(RegistryError::EmptyDataset(_))));
    }

    #[test]
    fn test_binary_share_excludes_other_codes() {
        let rows = genders(&[2020, 2020, 2020, 2020, 2021], &[1, 1, 2, 3, 2]);
        let series = binary_share(
            &rows,
            "year",
            "gender",
            &CodeLabel::new(1, "Male"),
            &CodeLabel::new(2, "Female"),
            Some(2020..=2022),
        )
        .unwrap();

        assert_eq!(series.excluded, 1);
        assert_eq!(series.periods.len(), 3);
        let first = series.periods[0];
        assert!((first.first_percentage().unwrap() - 200.0 / 3.0).abs() < 1e-9);
        assert!((first.second_percentage().unwrap() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(series.periods[1].first_percentage(), Some(0.0));
        assert_eq!(series.periods[2].total(), 0);
        assert_eq!(series.periods[2].first_percentage(), None);
    }

    #[test]
    fn test_binary_share_without_codes_is_error() {
        let rows = genders(&[2020], &[9]);
        let result = binary_share(
            &rows,
            "year",
            "gender",
            &CodeLabel::new(1, "Male"),
            &CodeLabel::new(2, "Female"),
            None,
        );
        assert!(matches!(result, Err(RegistryError::EmptyDataset(_))));
    }
}
