//! Chart output
//!
//! The pipeline hands every computed report to a [`ChartSink`]. The
//! [`PngRenderer`] draws one PNG per report with plotters; tests substitute a
//! recording sink.

pub mod charts;
pub mod palette;

use std::path::{Path, PathBuf};

use plotters::style::RGBColor;

use self::charts::Canvas;
use crate::algorithm::report::{ChartKind, ReportData, ReportSpec};
use crate::config::AnalysisConfig;
use crate::error::{IoResultExt, RegistryError, Result};

/// Destination for computed reports
pub trait ChartSink {
    /// Render one report, returning the written file if there is one
    fn render(&mut self, spec: &ReportSpec, data: &ReportData) -> Result<Option<PathBuf>>;
}

/// Writes each report as `<output_dir>/<name>.png`
#[derive(Debug, Clone)]
pub struct PngRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
    palette: Vec<RGBColor>,
}

impl PngRenderer {
    /// Create a renderer, creating `output_dir` if needed
    pub fn new(output_dir: impl Into<PathBuf>, size: (u32, u32), palette: Vec<RGBColor>) -> Result<Self> {
        let output_dir = output_dir.into();
        if palette.is_empty() {
            return Err(RegistryError::config("palette must contain at least one color"));
        }
        std::fs::create_dir_all(&output_dir).with_path(&output_dir)?;
        Ok(Self {
            output_dir,
            size,
            palette,
        })
    }

    /// Renderer using the output directory, size and palette of `config`
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Self::new(
            &config.output_dir,
            (config.chart_width, config.chart_height),
            palette::parse_palette(&config.palette)?,
        )
    }

    /// Directory charts are written to
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn chart_path(&self, spec: &ReportSpec) -> PathBuf {
        self.output_dir.join(format!("{}.png", spec.name))
    }
}

impl ChartSink for PngRenderer {
    fn render(&mut self, spec: &ReportSpec, data: &ReportData) -> Result<Option<PathBuf>> {
        if data.is_empty() {
            return Err(RegistryError::render(format!(
                "report '{}' has nothing to draw",
                spec.name
            )));
        }

        let path = self.chart_path(spec);
        let canvas = Canvas {
            path: &path,
            size: self.size,
            spec,
        };

        match (spec.chart, data) {
            (ChartKind::Pie, ReportData::Shares(breakdown)) => {
                charts::draw_pie(canvas, breakdown, &self.palette)?;
            }
            (ChartKind::Line, ReportData::BinaryShare(series)) => {
                charts::draw_binary_share(canvas, series)?;
            }
            (ChartKind::Line, ReportData::Counts(points)) => charts::draw_count_line(canvas, points)?,
            (ChartKind::Bar, ReportData::Counts(points)) => charts::draw_count_bars(canvas, points)?,
            (ChartKind::StackedBar { y_max }, ReportData::Matrix(matrix)) => {
                charts::draw_stacked_bars(canvas, matrix, y_max, &self.palette)?;
            }
            (chart, _) => {
                return Err(RegistryError::render(format!(
                    "report '{}' cannot be drawn as {chart:?}",
                    spec.name
                )));
            }
        }

        log::debug!("Wrote chart {}", path.display());
        Ok(Some(path))
    }
}
