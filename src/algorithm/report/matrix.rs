//! Row-by-series count matrices with per-row top-N truncation.

use arrow::record_batch::RecordBatch;
use itertools::Itertools;

use crate::algorithm::aggregate::{GroupValue, count_by_pair};
use crate::error::Result;

/// Sparse count matrix; missing combinations are zero
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountMatrix {
    /// Row keys, ascending
    pub rows: Vec<GroupValue>,
    /// Series keys kept in at least one row, ascending
    pub columns: Vec<GroupValue>,
    /// `cells[row][column]`
    pub cells: Vec<Vec<u64>>,
}

impl CountMatrix {
    /// Count for a row/series pair, zero when absent
    #[must_use]
    pub fn get(&self, row: &GroupValue, column: &GroupValue) -> u64 {
        let (Some(r), Some(c)) = (
            self.rows.iter().position(|v| v == row),
            self.columns.iter().position(|v| v == column),
        ) else {
            return 0;
        };
        self.cells[r][c]
    }

    /// Non-zero cells of one row, in column order
    pub fn row_entries(&self, row_idx: usize) -> impl Iterator<Item = (&GroupValue, u64)> + '_ {
        self.columns
            .iter()
            .zip(self.cells[row_idx].iter().copied())
            .filter(|(_, count)| *count > 0)
    }

    /// Sum of one row
    #[must_use]
    pub fn row_total(&self, row_idx: usize) -> u64 {
        self.cells[row_idx].iter().sum()
    }
}

/// Count `(row, series)` pairs and keep the `limit` largest series per row
///
/// Within a row, series are ranked by descending count and ties go to the
/// alphabetically first series. Rows are independent: a series dropped from
/// one row can still appear in another.
pub fn top_n_matrix(
    rows: &RecordBatch,
    row_column: &str,
    series_column: &str,
    limit: usize,
) -> Result<CountMatrix> {
    let pairs = count_by_pair(rows, row_column, series_column)?;

    let mut kept: Vec<(GroupValue, Vec<(GroupValue, u64)>)> = Vec::new();
    let grouped = pairs.into_iter().chunk_by(|((row, _), _)| row.clone());
    for (row, entries) in &grouped {
        let top: Vec<(GroupValue, u64)> = entries
            .map(|((_, series), count)| (series, count))
            .sorted_by(|(a_series, a_count), (b_series, b_count)| {
                b_count.cmp(a_count).then_with(|| a_series.cmp(b_series))
            })
            .take(limit)
            .collect();
        kept.push((row, top));
    }

    let columns: Vec<GroupValue> = kept
        .iter()
        .flat_map(|(_, top)| top.iter().map(|(series, _)| series.clone()))
        .sorted()
        .dedup()
        .collect();

    let cells = kept
        .iter()
        .map(|(_, top)| {
            columns
                .iter()
                .map(|column| {
                    top.iter()
                        .find(|(series, _)| series == column)
                        .map_or(0, |(_, count)| *count)
                })
                .collect()
        })
        .collect();

    Ok(CountMatrix {
        rows: kept.into_iter().map(|(row, _)| row).collect(),
        columns,
        cells,
    })
}
