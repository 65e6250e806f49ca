//! End-to-end run: prepare the raw export, reload it and render every report
//!
//! Preparation and reload failures abort the run. A failing report is logged
//! and recorded as skipped; the remaining reports still run.

use std::path::PathBuf;
use std::time::Instant;

use arrow::record_batch::RecordBatch;

use crate::algorithm::report::{ReportSpec, compute, standard_reports};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::preparation::{PreparationStats, prepare_dataset};
use crate::reader::read_prepared;
use crate::render::ChartSink;
use crate::utils::logging::{create_report_progress_bar, finish_progress_bar};
use crate::utils::{log_operation_complete, log_warning};

/// Reason recorded for reports whose filter matched nothing to draw
pub const NO_ROWS_MATCHED: &str = "no rows matched";

/// What happened to one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    /// The sink accepted the report, possibly writing a file
    Rendered(Option<PathBuf>),
    /// The report was not drawn, with the reason
    Skipped(String),
}

/// Outcome of one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Report name
    pub name: String,
    /// Rendered or skipped
    pub status: ReportStatus,
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Row counts of the preparation step
    pub preparation: PreparationStats,
    /// One entry per report, in rendering order
    pub outcomes: Vec<ReportOutcome>,
}

impl RunSummary {
    /// Number of rendered reports
    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ReportStatus::Rendered(_)))
            .count()
    }

    /// Number of skipped reports
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.rendered_count()
    }

    /// Outcome of a report by name
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&ReportOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

/// Run the whole pipeline with the standard reports
pub fn run(config: &AnalysisConfig, sink: &mut dyn ChartSink) -> Result<RunSummary> {
    config.validate()?;
    log::debug!("{config}");

    let preparation = prepare_dataset(&config.raw_path, &config.prepared_path)?;

    let start = Instant::now();
    let table = read_prepared(&config.prepared_path)?;
    log_operation_complete("reloaded", &config.prepared_path, table.num_rows(), Some(start.elapsed()));

    let outcomes = run_reports(&standard_reports(config), &table, sink);
    Ok(RunSummary {
        preparation,
        outcomes,
    })
}

/// Compute and render `reports` one after another over the prepared table
pub fn run_reports(
    reports: &[ReportSpec],
    table: &RecordBatch,
    sink: &mut dyn ChartSink,
) -> Vec<ReportOutcome> {
    let pb = create_report_progress_bar(reports.len() as u64, Some("Rendering reports"));

    let outcomes = reports
        .iter()
        .map(|spec| {
            pb.set_message(spec.name.clone());
            let status = run_report(spec, table, &mut *sink).unwrap_or_else(|e| {
                log_warning(&e.to_string(), Some(&spec.name));
                ReportStatus::Skipped(e.to_string())
            });
            pb.inc(1);
            ReportOutcome {
                name: spec.name.clone(),
                status,
            }
        })
        .collect();

    finish_progress_bar(&pb, Some("Reports done"));
    outcomes
}

fn run_report(spec: &ReportSpec, table: &RecordBatch, sink: &mut dyn ChartSink) -> Result<ReportStatus> {
    let data = compute(spec, table)?;
    log::info!("{}:\n{}", spec.title, data);

    if data.is_empty() {
        log_warning(NO_ROWS_MATCHED, Some(&spec.name));
        return Ok(ReportStatus::Skipped(NO_ROWS_MATCHED.to_string()));
    }

    sink.render(spec, &data).map(ReportStatus::Rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary {
            preparation: PreparationStats::default(),
            outcomes: vec![
                ReportOutcome {
                    name: "a".to_string(),
                    status: ReportStatus::Rendered(None),
                },
                ReportOutcome {
                    name: "b".to_string(),
                    status: ReportStatus::Skipped(NO_ROWS_MATCHED.to_string()),
                },
            ],
        };
        assert_eq!(summary.rendered_count(), 1);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(
            summary.outcome("b").map(|o| &o.status),
            Some(&ReportStatus::Skipped(NO_ROWS_MATCHED.to_string()))
        );
    }
}
