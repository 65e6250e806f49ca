mod utils;

use dog_registry::pipeline::NO_ROWS_MATCHED;
use dog_registry::{AnalysisConfig, RegistryError, ReportData, ReportStatus, run};
use utils::{DogRow, RecordingSink, Workspace};

fn config_for(workspace: &Workspace) -> AnalysisConfig {
    AnalysisConfig {
        raw_path: workspace.raw.clone(),
        prepared_path: workspace.prepared.clone(),
        output_dir: workspace.dir.path().join("charts"),
        ..Default::default()
    }
}

fn sample_rows() -> Vec<DogRow> {
    vec![
        DogRow::new(2021, "Labrador").owner_gender(2),
        DogRow::new(2022, "Pudel").owner_age(999),
        DogRow::new(2023, "Labrador").owner_age(30).dog_age(4),
        DogRow::new(2023, "Pudel").owner_age(50).dog_gender(2).district("Enge"),
        DogRow::new(2023, "Mischling").mixed("Mischling").owner_gender(2),
    ]
}

#[test]
fn test_run_renders_every_standard_report() {
    let workspace = Workspace::with_rows(&sample_rows());
    let config = config_for(&workspace);
    let mut sink = RecordingSink::default();

    let summary = run(&config, &mut sink).unwrap();

    assert_eq!(summary.preparation.rows_read, 5);
    assert_eq!(summary.preparation.rows_dropped, 1);
    assert!(workspace.prepared.exists());
    assert_eq!(summary.outcomes.len(), 9);
    assert_eq!(summary.rendered_count(), 9);
    assert_eq!(sink.rendered.len(), 9);

    let Some(ReportData::Counts(ages)) = sink.data("breed_age_labrador_male_2023") else {
        panic!("focus breed report was not rendered");
    };
    assert_eq!(ages.len(), 1);
    assert_eq!(ages[0].1, 1);
}

#[test]
fn test_reports_without_rows_are_skipped() {
    let workspace = Workspace::with_rows(&sample_rows());
    let config = AnalysisConfig {
        focus_breed: "Dodo".to_string(),
        ..config_for(&workspace)
    };
    let mut sink = RecordingSink::default();

    let summary = run(&config, &mut sink).unwrap();

    let outcome = summary.outcome("breed_age_dodo_male_2023").unwrap();
    assert_eq!(outcome.status, ReportStatus::Skipped(NO_ROWS_MATCHED.to_string()));
    assert_eq!(summary.skipped_count(), 1);
    assert_eq!(sink.rendered.len(), 8);
}

#[test]
fn test_failing_report_does_not_stop_the_run() {
    let workspace = Workspace::with_rows(&sample_rows());
    let config = AnalysisConfig {
        target_year: 2030,
        ..config_for(&workspace)
    };
    let mut sink = RecordingSink::failing_on("pedigree_trend");

    let summary = run(&config, &mut sink).unwrap();

    // No 2030 rows: the breed share has nothing to share out
    let breed_share = summary.outcome("breed_share_2030").unwrap();
    assert!(matches!(&breed_share.status, ReportStatus::Skipped(reason) if reason.contains("Empty dataset")));

    let trend = summary.outcome("pedigree_trend").unwrap();
    assert!(matches!(&trend.status, ReportStatus::Skipped(reason) if reason.contains("refusing")));

    assert!(matches!(
        summary.outcome("owner_gender_share").unwrap().status,
        ReportStatus::Rendered(None)
    ));
    assert_eq!(summary.outcomes.len(), 9);
    assert_eq!(summary.rendered_count(), 1);
}

#[test]
fn test_missing_raw_dataset_aborts() {
    let workspace = Workspace::new();
    let mut sink = RecordingSink::default();

    let result = run(&config_for(&workspace), &mut sink);
    assert!(matches!(result, Err(RegistryError::Io { .. })));
    assert!(sink.rendered.is_empty());
}

#[test]
fn test_invalid_config_aborts_before_preparation() {
    let workspace = Workspace::with_rows(&sample_rows());
    let config = AnalysisConfig {
        top_n: 0,
        ..config_for(&workspace)
    };
    let mut sink = RecordingSink::default();

    let result = run(&config, &mut sink);
    assert!(matches!(result, Err(RegistryError::Config(_))));
    assert!(!workspace.prepared.exists());
}
