//! Parameterized descriptive reports
//!
//! Every chart the pipeline produces is described by a [`ReportSpec`]: a row
//! filter, a [`Measure`] saying how the filtered rows are aggregated, and a
//! [`ChartKind`] for the renderer. [`compute`] turns a report and the prepared
//! table into [`ReportData`].

pub mod catalog;
pub mod counts;
pub mod matrix;
pub mod shares;

use std::fmt;

use arrow::record_batch::RecordBatch;

use crate::algorithm::aggregate::{GroupValue, period_domain};
use crate::error::Result;
use crate::filter::{BatchFilter, Expr};

pub use catalog::standard_reports;
pub use matrix::CountMatrix;
pub use shares::{BinaryShareSeries, PeriodShare, Share, ShareBreakdown};

/// A gender (or other) code together with its display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLabel {
    /// Code as stored in the table
    pub code: i64,
    /// Label shown in legends
    pub label: String,
}

impl CodeLabel {
    /// Create a code/label pair
    pub fn new(code: i64, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }
}

/// How the filtered rows of a report are aggregated
#[derive(Debug, Clone, PartialEq)]
pub enum Measure {
    /// Percentage of rows per value of `column`; values at or below
    /// `threshold_pct` are folded into one bucket labelled `other_label`
    Share {
        column: String,
        threshold_pct: f64,
        other_label: String,
    },
    /// Per-period percentage of two codes, computed over those two codes only
    BinaryShare {
        period_column: String,
        code_column: String,
        first: CodeLabel,
        second: CodeLabel,
    },
    /// Row count per value of `column`, ascending by value
    Frequency { column: String },
    /// Row count per period, zero-filled across the periods of the input table
    TimeSeries { period_column: String },
    /// Row count per `(row, series)` pair, keeping the `limit` largest series per row
    TopN {
        row_column: String,
        series_column: String,
        limit: usize,
    },
}

/// Chart family used to draw a report
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartKind {
    /// Pie chart of shares
    Pie,
    /// Line chart over periods
    Line,
    /// Single-series bar chart
    Bar,
    /// Stacked bars, one stack per matrix row; the y axis reaches at least `y_max`
    StackedBar { y_max: Option<f64> },
}

/// A complete report description
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSpec {
    /// Stable identifier, also the chart file stem
    pub name: String,
    /// Chart title
    pub title: String,
    /// X axis label
    pub x_label: String,
    /// Y axis label
    pub y_label: String,
    /// Rows the report covers
    pub filter: Expr,
    /// Aggregation applied to the filtered rows
    pub measure: Measure,
    /// How the result is drawn
    pub chart: ChartKind,
}

/// Aggregated result of a report, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub enum ReportData {
    /// Percentage breakdown
    Shares(ShareBreakdown),
    /// Two-code percentage time series
    BinaryShare(BinaryShareSeries),
    /// Counts keyed by a single value
    Counts(Vec<(GroupValue, u64)>),
    /// Sparse counts keyed by row and series
    Matrix(CountMatrix),
}

impl ReportData {
    /// Whether there is nothing to draw
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Shares(breakdown) => breakdown.shares.is_empty(),
            Self::BinaryShare(series) => series.periods.is_empty(),
            Self::Counts(points) => points.is_empty(),
            Self::Matrix(matrix) => matrix.rows.is_empty(),
        }
    }
}

impl fmt::Display for ReportData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shares(breakdown) => {
                for share in &breakdown.shares {
                    writeln!(f, "  {}: {:.2}%", share.label, share.percentage)?;
                }
                Ok(())
            }
            Self::BinaryShare(series) => {
                for period in &series.periods {
                    let fmt_pct = |pct: Option<f64>| {
                        pct.map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}%"))
                    };
                    writeln!(
                        f,
                        "  {}: {} {}, {} {}",
                        period.period,
                        series.first.label,
                        fmt_pct(period.first_percentage()),
                        series.second.label,
                        fmt_pct(period.second_percentage())
                    )?;
                }
                Ok(())
            }
            Self::Counts(points) => {
                for (key, count) in points {
                    writeln!(f, "  {key}: {count}")?;
                }
                Ok(())
            }
            Self::Matrix(matrix) => {
                for (row_idx, row) in matrix.rows.iter().enumerate() {
                    let cells: Vec<String> = matrix
                        .row_entries(row_idx)
                        .map(|(series, count)| format!("{series}={count}"))
                        .collect();
                    writeln!(f, "  {row}: {}", cells.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Compute a report over the prepared table
///
/// The filter is applied first; time-series measures take their period
/// range from `table` before filtering so that periods with no matching rows
/// still appear.
pub fn compute(spec: &ReportSpec, table: &RecordBatch) -> Result<ReportData> {
    spec.filter.check_columns(table)?;

    let domain = match &spec.measure {
        Measure::BinaryShare { period_column, .. } | Measure::TimeSeries { period_column } => {
            period_domain(table, period_column)?
        }
        _ => None,
    };

    let rows = spec.filter.filter(table)?;
    log::debug!(
        "Report '{}' covers {} of {} rows ({})",
        spec.name,
        rows.num_rows(),
        table.num_rows(),
        spec.filter
    );

    match &spec.measure {
        Measure::Share {
            column,
            threshold_pct,
            other_label,
        } => shares::share_breakdown(&rows, column, *threshold_pct, other_label)
            .map(ReportData::Shares),
        Measure::BinaryShare {
            period_column,
            code_column,
            first,
            second,
        } => shares::binary_share(&rows, period_column, code_column, first, second, domain)
            .map(ReportData::BinaryShare),
        Measure::Frequency { column } => counts::frequency(&rows, column).map(ReportData::Counts),
        Measure::TimeSeries { period_column } => {
            counts::time_series(&rows, period_column, domain).map(ReportData::Counts)
        }
        Measure::TopN {
            row_column,
            series_column,
            limit,
        } => matrix::top_n_matrix(&rows, row_column, series_column, *limit)
            .map(ReportData::Matrix),
    }
}
