//! The fixed set of reports drawn for a pipeline run.

use super::{ChartKind, CodeLabel, Measure, ReportSpec};
use crate::config::{AnalysisConfig, FEMALE_CODE, MALE_CODE};
use crate::filter::Expr;
use crate::schema::{BREED, DISTRICT, DOG_AGE, DOG_GENDER, MIXED_BREED, OWNER_AGE, OWNER_GENDER, YEAR};

/// All standard reports for `config`, in rendering order
#[must_use]
pub fn standard_reports(config: &AnalysisConfig) -> Vec<ReportSpec> {
    let year = config.target_year;

    vec![
        breed_share(config),
        owner_gender_share(config),
        ReportSpec {
            name: format!("owner_age_{year}"),
            title: format!("Frequency of Dog Owners by Age Group in {year}"),
            x_label: "Age Group".to_string(),
            y_label: "Frequency".to_string(),
            filter: Expr::eq_int(YEAR, year),
            measure: Measure::Frequency {
                column: OWNER_AGE.to_string(),
            },
            chart: ChartKind::Bar,
        },
        ReportSpec {
            name: "pedigree_trend".to_string(),
            title: "Change in Number of Pedigree Dogs Over Time".to_string(),
            x_label: "Year".to_string(),
            y_label: "Number of Pedigree Dogs".to_string(),
            filter: pedigree(config),
            measure: Measure::TimeSeries {
                period_column: YEAR.to_string(),
            },
            chart: ChartKind::Line,
        },
        district_top_breeds(config, FEMALE_CODE),
        district_top_breeds(config, MALE_CODE),
        ReportSpec {
            name: format!("pedigree_by_district_{year}"),
            title: format!("Frequency of pedigree dogs by City District in {year}"),
            x_label: "City District".to_string(),
            y_label: "Count".to_string(),
            filter: Expr::all(vec![Expr::eq_int(YEAR, year), pedigree(config)]),
            measure: Measure::Frequency {
                column: DISTRICT.to_string(),
            },
            chart: ChartKind::Bar,
        },
        ReportSpec {
            name: format!("pedigree_by_age_{year}"),
            title: format!("Age of the Pedigree dogs in {year}"),
            x_label: "Age of the dog".to_string(),
            y_label: "Count".to_string(),
            filter: Expr::all(vec![Expr::eq_int(YEAR, year), pedigree(config)]),
            measure: Measure::Frequency {
                column: DOG_AGE.to_string(),
            },
            chart: ChartKind::Bar,
        },
        focus_breed_ages(config),
    ]
}

/// Lowercase `value` for use in a report name, keeping only `[a-z0-9_]`
fn name_part(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
        .collect()
}

fn pedigree(config: &AnalysisConfig) -> Expr {
    Expr::eq_str(MIXED_BREED, config.pedigree_marker.as_str())
}

fn breed_share(config: &AnalysisConfig) -> ReportSpec {
    let year = config.target_year;
    let threshold = config.breed_share_threshold;

    ReportSpec {
        name: format!("breed_share_{year}"),
        title: format!("Percentage of Dog Breeds in {year}"),
        x_label: String::new(),
        y_label: String::new(),
        filter: Expr::eq_int(YEAR, year),
        measure: Measure::Share {
            column: BREED.to_string(),
            threshold_pct: threshold,
            other_label: format!("Other (breeds with a percentage lower than {threshold}%)"),
        },
        chart: ChartKind::Pie,
    }
}

fn owner_gender_share(config: &AnalysisConfig) -> ReportSpec {
    let male = config.gender_label(MALE_CODE);
    let female = config.gender_label(FEMALE_CODE);

    ReportSpec {
        name: "owner_gender_share".to_string(),
        title: format!("Percentage of {male} and {female} Dog Owners in Zurich"),
        x_label: "Year".to_string(),
        y_label: "Percentage".to_string(),
        filter: Expr::AlwaysTrue,
        measure: Measure::BinaryShare {
            period_column: YEAR.to_string(),
            code_column: OWNER_GENDER.to_string(),
            first: CodeLabel::new(MALE_CODE, male),
            second: CodeLabel::new(FEMALE_CODE, female),
        },
        chart: ChartKind::Line,
    }
}

fn district_top_breeds(config: &AnalysisConfig, dog_gender: i64) -> ReportSpec {
    let year = config.target_year;
    let label = config.gender_label(dog_gender);

    ReportSpec {
        name: format!("top_breeds_{}_{year}", name_part(&label)),
        title: format!(
            "Top {} Pedigree {label} Dog Breeds by City District in {year}",
            config.top_n
        ),
        x_label: "City District".to_string(),
        y_label: "Count".to_string(),
        filter: Expr::all(vec![
            Expr::eq_int(YEAR, year),
            Expr::eq_int(DOG_GENDER, dog_gender),
            pedigree(config),
        ]),
        measure: Measure::TopN {
            row_column: DISTRICT.to_string(),
            series_column: BREED.to_string(),
            limit: config.top_n,
        },
        chart: ChartKind::StackedBar {
            y_max: Some(config.stacked_y_max),
        },
    }
}

fn focus_breed_ages(config: &AnalysisConfig) -> ReportSpec {
    let year = config.target_year;
    let breed = &config.focus_breed;
    let gender = config.gender_label(config.focus_dog_gender);

    ReportSpec {
        name: format!("breed_age_{}_{}_{year}", name_part(breed), name_part(&gender)),
        title: format!("Age of {gender} {breed} pedigree dogs in {year}"),
        x_label: "Age of the dog".to_string(),
        y_label: "Count".to_string(),
        filter: Expr::all(vec![
            Expr::eq_int(YEAR, year),
            Expr::eq_str(BREED, breed.as_str()),
            Expr::eq_int(DOG_GENDER, config.focus_dog_gender),
            pedigree(config),
        ]),
        measure: Measure::Frequency {
            column: DOG_AGE.to_string(),
        },
        chart: ChartKind::Bar,
    }
}
