//! Progress reporting for the report stage
//!
//! Reports are rendered one after another; a single bar tracks them using the
//! indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Template for the report progress bar
pub const REPORT_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Create the progress bar tracking report rendering
///
/// # Arguments
/// * `length` - Number of reports
/// * `description` - Optional initial message
#[must_use]
pub fn create_report_progress_bar(length: u64, description: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(REPORT_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }

    pb
}

/// Finish a progress bar with an optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}
