use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use dog_registry::utils::logging::console::{print_artifact_written, print_run_summary};
use dog_registry::{AnalysisConfig, PngRenderer, run};
use log::info;

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AnalysisConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    info!("{config}");

    let start = Instant::now();
    let mut renderer = PngRenderer::from_config(&config)
        .with_context(|| format!("Failed to set up chart output in {}", config.output_dir.display()))?;
    let summary = run(&config, &mut renderer)
        .with_context(|| format!("Failed to process {}", config.raw_path.display()))?;

    print_artifact_written(&config.prepared_path);
    print_run_summary(&summary);
    info!(
        "Finished in {:?}: {} reports rendered to {}, {} skipped",
        start.elapsed(),
        summary.rendered_count(),
        renderer.output_dir().display(),
        summary.skipped_count()
    );

    Ok(())
}
