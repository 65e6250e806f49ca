//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use std::path::Path;

use crate::pipeline::{ReportStatus, RunSummary};

/// Print the confirmation that the prepared artifact was written
pub fn print_artifact_written(path: &Path) {
    println!(
        "Selected data with headers has been written to {}.",
        path.display()
    );
}

/// Print one line per report followed by a rendered/skipped tally
pub fn print_run_summary(summary: &RunSummary) {
    println!("Reports:");
    for outcome in &summary.outcomes {
        match &outcome.status {
            ReportStatus::Rendered(Some(path)) => {
                println!("  [ok]      {} -> {}", outcome.name, path.display());
            }
            ReportStatus::Rendered(None) => println!("  [ok]      {}", outcome.name),
            ReportStatus::Skipped(reason) => {
                println!("  [skipped] {} ({reason})", outcome.name);
            }
        }
    }
    println!(
        "{} rendered, {} skipped",
        summary.rendered_count(),
        summary.skipped_count()
    );
}
