//! Configuration for the registry analysis pipeline.
//!
//! Every parameter the pipeline consumes lives here so that a run can target
//! another year, breed or dog gender without code edits.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, RegistryError, Result};
use crate::render::palette::parse_hex_color;

/// Default stacked-chart palette, one distinct color per breed series
pub const DEFAULT_PALETTE: [&str; 22] = [
    "#0000FF", "#FFA500", "#008000", "#FF0000", "#800080", "#A52A2A", "#FF1493", "#808080",
    "#808000", "#ADD8E6", "#00008B", "#FF8C00", "#90EE90", "#8B0000", "#FF69B4", "#C71585",
    "#FFB6C1", "#D3D3D3", "#CD5C5C", "#DC143C", "#B22222", "#40E0D0",
];

/// Code used for male owners and dogs
pub const MALE_CODE: i64 = 1;
/// Code used for female owners and dogs
pub const FEMALE_CODE: i64 = 2;

/// Configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Raw registry CSV
    pub raw_path: PathBuf,
    /// Destination of the prepared artifact
    pub prepared_path: PathBuf,
    /// Directory charts are written to
    pub output_dir: PathBuf,
    /// Year analysed by the year-filtered reports
    pub target_year: i64,
    /// Mixed-breed value marking a pedigree dog
    pub pedigree_marker: String,
    /// Human-readable labels for gender codes
    pub gender_labels: BTreeMap<i64, String>,
    /// Breed analysed by the single-breed age report
    pub focus_breed: String,
    /// Dog gender code analysed by the single-breed age report
    pub focus_dog_gender: i64,
    /// Breeds at or below this percentage are folded into "Other"
    pub breed_share_threshold: f64,
    /// Breeds kept per district in the top-N reports
    pub top_n: usize,
    /// Lowest y-axis ceiling for stacked district charts
    pub stacked_y_max: f64,
    /// Colors for stacked chart series, as `#RRGGBB`
    pub palette: Vec<String>,
    /// Chart width in pixels
    pub chart_width: u32,
    /// Chart height in pixels
    pub chart_height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let mut gender_labels = BTreeMap::new();
        gender_labels.insert(MALE_CODE, "Male".to_string());
        gender_labels.insert(FEMALE_CODE, "Female".to_string());

        Self {
            raw_path: PathBuf::from("dataset.csv"),
            prepared_path: PathBuf::from("dataset_prepared.csv"),
            output_dir: PathBuf::from("charts"),
            target_year: 2023,
            pedigree_marker: "Rassehund".to_string(),
            gender_labels,
            focus_breed: "Labrador".to_string(),
            focus_dog_gender: MALE_CODE,
            breed_share_threshold: 1.0,
            top_n: 5,
            stacked_y_max: 100.0,
            palette: DEFAULT_PALETTE.iter().map(ToString::to_string).collect(),
            chart_width: 1200,
            chart_height: 800,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            RegistryError::config(format!("Failed to parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration values are usable
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(RegistryError::config("top_n must be at least 1"));
        }
        if !(0.0..100.0).contains(&self.breed_share_threshold) {
            return Err(RegistryError::config(format!(
                "breed_share_threshold must be within [0, 100), got {}",
                self.breed_share_threshold
            )));
        }
        for code in [MALE_CODE, FEMALE_CODE] {
            if !self.gender_labels.contains_key(&code) {
                return Err(RegistryError::config(format!(
                    "gender_labels has no label for code {code}"
                )));
            }
        }
        if self.palette.is_empty() {
            return Err(RegistryError::config("palette must contain at least one color"));
        }
        for color in &self.palette {
            parse_hex_color(color)?;
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(RegistryError::config("chart dimensions must be non-zero"));
        }
        Ok(())
    }

    /// Label for a gender code, falling back to the code itself
    #[must_use]
    pub fn gender_label(&self, code: i64) -> String {
        self.gender_labels
            .get(&code)
            .cloned()
            .unwrap_or_else(|| format!("code {code}"))
    }
}

impl fmt::Display for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Configuration:")?;
        writeln!(f, "  Raw Dataset: {}", self.raw_path.display())?;
        writeln!(f, "  Prepared Artifact: {}", self.prepared_path.display())?;
        writeln!(f, "  Chart Directory: {}", self.output_dir.display())?;
        writeln!(f, "  Target Year: {}", self.target_year)?;
        writeln!(f, "  Pedigree Marker: {}", self.pedigree_marker)?;
        writeln!(
            f,
            "  Focus: {} {}",
            self.gender_label(self.focus_dog_gender),
            self.focus_breed
        )?;
        writeln!(f, "  Breed Share Threshold: {}%", self.breed_share_threshold)?;
        writeln!(f, "  Top Breeds per District: {}", self.top_n)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_year, 2023);
        assert_eq!(config.gender_label(1), "Male");
        assert_eq!(config.gender_label(2), "Female");
        assert_eq!(config.gender_label(7), "code 7");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AnalysisConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RegistryError::Config(_))));

        let config = AnalysisConfig {
            breed_share_threshold: 100.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            palette: vec!["blue".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.gender_labels.remove(&FEMALE_CODE);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"target_year": 2019, "focus_breed": "Pudel"}"#).unwrap();
        assert_eq!(config.target_year, 2019);
        assert_eq!(config.focus_breed, "Pudel");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.pedigree_marker, "Rassehund");
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"top_n": 3, "gender_labels": {"1": "M", "2": "F"}}"#).unwrap();
        let config = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.gender_label(MALE_CODE), "M");

        std::fs::write(&path, r#"{"top_n": 0}"#).unwrap();
        assert!(matches!(
            AnalysisConfig::from_json_file(&path),
            Err(RegistryError::Config(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_file(&dir.path().join("missing.json")),
            Err(RegistryError::Io { .. })
        ));
    }
}
