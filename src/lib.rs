//! Preparation and descriptive analysis of the Zurich dog registry
//!
//! The raw registry export is reduced to nine typed columns, filtered of rows
//! with an unknown owner age and written as a prepared CSV. Parameterized
//! reports aggregate the prepared table and are handed to a chart sink.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod preparation;
pub mod reader;
pub mod render;
pub mod schema;
pub mod utils;

// Core types
pub use config::AnalysisConfig;
pub use error::{RegistryError, Result};

// Pipeline stages
pub use pipeline::{ReportOutcome, ReportStatus, RunSummary, run, run_reports};
pub use preparation::{PreparationStats, prepare_dataset};
pub use reader::{read_prepared, read_raw};

// Reports
pub use algorithm::report::{ChartKind, Measure, ReportData, ReportSpec, compute, standard_reports};
pub use filter::{Expr, LiteralValue, filter_year};
pub use render::{ChartSink, PngRenderer};

// Arrow types
pub use arrow::record_batch::RecordBatch;
