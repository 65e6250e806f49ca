//! Aggregation over the prepared registry table
//!
//! `aggregate` holds the group-by counting primitives; `report` builds the
//! descriptive reports on top of them.

pub mod aggregate;
pub mod report;

pub use aggregate::{GroupValue, count_by, count_by_pair};
pub use report::{ChartKind, Measure, ReportData, ReportSpec, compute, standard_reports};
