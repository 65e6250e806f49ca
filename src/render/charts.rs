//! Chart drawing with the plotters bitmap backend
//!
//! Each function draws one chart family into a PNG file. Fonts come from the
//! backend's default `sans-serif` family so charts render headless.

use std::path::Path;

use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::palette::cycle;
use crate::algorithm::aggregate::GroupValue;
use crate::algorithm::report::{BinaryShareSeries, CountMatrix, ReportSpec, ShareBreakdown};
use crate::error::{RegistryError, Result};

const TITLE_FONT: (&str, f64) = ("sans-serif", 32.0);
const DESC_FONT: (&str, f64) = ("sans-serif", 22.0);
const LABEL_FONT: (&str, f64) = ("sans-serif", 16.0);
const LEGEND_FONT: (&str, f64) = ("sans-serif", 14.0);

/// Labels longer than this are drawn rotated on category axes
const ROTATE_LABELS_OVER: usize = 4;

/// Where and how large a chart is drawn
#[derive(Debug, Clone, Copy)]
pub struct Canvas<'a> {
    /// Target PNG file
    pub path: &'a Path,
    /// Width and height in pixels
    pub size: (u32, u32),
    /// Report providing title and axis labels
    pub spec: &'a ReportSpec,
}

fn render_err(e: impl std::fmt::Display) -> RegistryError {
    RegistryError::render(e.to_string())
}

/// Pie chart of a share breakdown, labelled with values and percentages
pub fn draw_pie(canvas: Canvas<'_>, breakdown: &ShareBreakdown, palette: &[RGBColor]) -> Result<()> {
    let root = BitMapBackend::new(canvas.path, canvas.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let area = root
        .titled(&canvas.spec.title, TITLE_FONT)
        .map_err(render_err)?;

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let sizes: Vec<f64> = breakdown.shares.iter().map(|s| s.percentage).collect();
    let labels: Vec<&str> = breakdown.shares.iter().map(|s| s.label.as_str()).collect();
    let colors: Vec<RGBColor> = (0..sizes.len()).map(|idx| cycle(palette, idx)).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(LABEL_FONT.into_font().color(&BLACK));
    pie.percentages(("sans-serif", radius * 0.05).into_font().color(&BLACK));
    area.draw(&pie).map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Two percentage lines over periods; periods without a value leave a gap
pub fn draw_binary_share(canvas: Canvas<'_>, series: &BinaryShareSeries) -> Result<()> {
    let periods: Vec<i64> = series.periods.iter().map(|p| p.period).collect();
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return Err(RegistryError::render("no periods to draw"));
    };

    let root = BitMapBackend::new(canvas.path, canvas.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&canvas.spec.title, TITLE_FONT)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(*first as f64 - 0.5..*last as f64 + 0.5, 0f64..100f64)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(&canvas.spec.x_label)
        .y_desc(&canvas.spec.y_label)
        .axis_desc_style(DESC_FONT)
        .label_style(LABEL_FONT)
        .x_label_formatter(&|x| format!("{:.0}", x.round()))
        .draw()
        .map_err(render_err)?;

    let lines = [
        (&series.first.label, BLUE, series.periods.iter().map(|p| p.first_percentage()).collect::<Vec<_>>()),
        (&series.second.label, RED, series.periods.iter().map(|p| p.second_percentage()).collect::<Vec<_>>()),
    ];

    for (label, color, values) in lines {
        for (run_idx, run) in contiguous_runs(&periods, &values).into_iter().enumerate() {
            let anno = chart
                .draw_series(LineSeries::new(run, color.stroke_width(2)).point_size(4))
                .map_err(render_err)?;
            if run_idx == 0 {
                anno.label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }
    }

    chart
        .configure_series_labels()
        .label_font(LABEL_FONT)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Split a series with gaps into runs of consecutive present values
fn contiguous_runs(periods: &[i64], values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (period, value) in periods.iter().zip(values) {
        match value {
            Some(v) => current.push((*period as f64, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Count per integer period as a line with point markers
pub fn draw_count_line(canvas: Canvas<'_>, points: &[(GroupValue, u64)]) -> Result<()> {
    let series: Vec<(f64, f64)> = points
        .iter()
        .map(|(key, count)| {
            key.as_int()
                .map(|period| (period as f64, *count as f64))
                .ok_or_else(|| RegistryError::render(format!("'{key}' is not a period")))
        })
        .collect::<Result<_>>()?;
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(RegistryError::render("no periods to draw"));
    };
    let y_top = headroom(series.iter().map(|(_, y)| *y).fold(0.0, f64::max));

    let root = BitMapBackend::new(canvas.path, canvas.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&canvas.spec.title, TITLE_FONT)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(first.0 - 0.5..last.0 + 0.5, 0f64..y_top)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(&canvas.spec.x_label)
        .y_desc(&canvas.spec.y_label)
        .axis_desc_style(DESC_FONT)
        .label_style(LABEL_FONT)
        .x_label_formatter(&|x| format!("{:.0}", x.round()))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(series, RED.stroke_width(2)).point_size(4))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Single-series bar chart over category labels
pub fn draw_count_bars(canvas: Canvas<'_>, points: &[(GroupValue, u64)]) -> Result<()> {
    if points.is_empty() {
        return Err(RegistryError::render("no bars to draw"));
    }
    let labels: Vec<String> = points.iter().map(|(key, _)| key.to_string()).collect();
    let y_top = headroom(points.iter().map(|(_, c)| *c as f64).fold(0.0, f64::max));

    let series = BarSeries {
        label: None,
        color: RED,
        bars: points
            .iter()
            .enumerate()
            .map(|(idx, (_, count))| (idx as u32, 0.0, *count as f64))
            .collect(),
    };
    draw_bars(canvas, &labels, y_top, vec![series])
}

/// Stacked bars: one stack per matrix row, one colored segment per series
pub fn draw_stacked_bars(
    canvas: Canvas<'_>,
    matrix: &CountMatrix,
    y_max: Option<f64>,
    palette: &[RGBColor],
) -> Result<()> {
    if matrix.rows.is_empty() {
        return Err(RegistryError::render("no stacks to draw"));
    }
    let labels: Vec<String> = matrix.rows.iter().map(ToString::to_string).collect();
    let tallest = (0..matrix.rows.len())
        .map(|idx| matrix.row_total(idx) as f64)
        .fold(0.0, f64::max);
    let y_top = headroom(tallest).max(y_max.unwrap_or(0.0));

    let mut bases = vec![0u64; matrix.rows.len()];
    let series = matrix
        .columns
        .iter()
        .enumerate()
        .map(|(col_idx, column)| {
            let bars = matrix
                .cells
                .iter()
                .enumerate()
                .filter(|(_, row)| row[col_idx] > 0)
                .map(|(row_idx, row)| {
                    let from = bases[row_idx];
                    bases[row_idx] += row[col_idx];
                    (row_idx as u32, from as f64, bases[row_idx] as f64)
                })
                .collect();
            BarSeries {
                label: Some(column.to_string()),
                color: cycle(palette, col_idx),
                bars,
            }
        })
        .collect();

    draw_bars(canvas, &labels, y_top, series)
}

/// Rectangles of one color; each bar is `(category, from, to)`
struct BarSeries {
    label: Option<String>,
    color: RGBColor,
    bars: Vec<(u32, f64, f64)>,
}

/// X axis with one unit-wide slot per category, centered on its index
///
/// Ticks sit only on the category centers, so a single category fills the
/// whole plot.
fn category_axis(count: usize) -> WithKeyPoints<RangedCoordf64> {
    let centers: Vec<f64> = (0..count).map(|idx| idx as f64).collect();
    (-0.5..count as f64 - 0.5).with_key_points(centers)
}

/// Bars over one x slot per label with a linear y axis up to `y_top`
///
/// A legend is drawn when any series is labelled.
fn draw_bars(canvas: Canvas<'_>, labels: &[String], y_top: f64, series: Vec<BarSeries>) -> Result<()> {
    let rotate = labels.iter().any(|l| l.chars().count() > ROTATE_LABELS_OVER);
    let label_area = if rotate { 160 } else { 60 };

    let root = BitMapBackend::new(canvas.path, canvas.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&canvas.spec.title, TITLE_FONT)
        .margin(20)
        .x_label_area_size(label_area)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(labels.len()), 0f64..y_top)
        .map_err(render_err)?;

    let x_style = if rotate {
        LABEL_FONT.into_font().transform(FontTransform::Rotate90)
    } else {
        LABEL_FONT.into_font()
    };
    let formatter = |x: &f64| {
        usize::try_from(x.round() as i64)
            .ok()
            .and_then(|idx| labels.get(idx).cloned())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&canvas.spec.x_label)
        .y_desc(&canvas.spec.y_label)
        .axis_desc_style(DESC_FONT)
        .x_labels(labels.len())
        .x_label_style(x_style)
        .y_label_style(LABEL_FONT)
        .x_label_formatter(&formatter)
        .draw()
        .map_err(render_err)?;

    let with_legend = series.iter().any(|s| s.label.is_some());
    for BarSeries { label, color, bars } in series {
        let anno = chart
            .draw_series(bars.into_iter().map(|(idx, from, to)| {
                let center = f64::from(idx);
                let mut rect =
                    Rectangle::new([(center - 0.5, from), (center + 0.5, to)], color.filled());
                rect.set_margin(0, 0, 4, 4);
                rect
            }))
            .map_err(render_err)?;
        if let Some(label) = label {
            anno.label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }
    }

    if with_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperMiddle)
            .label_font(LEGEND_FONT)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

/// Upper y bound leaving room above the tallest value
fn headroom(max_value: f64) -> f64 {
    (max_value * 1.1).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_runs_split_on_gaps() {
        let runs = contiguous_runs(
            &[2015, 2016, 2017, 2018],
            &[Some(40.0), None, Some(50.0), Some(55.0)],
        );
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(2015.0, 40.0)]);
        assert_eq!(runs[1], vec![(2017.0, 50.0), (2018.0, 55.0)]);
    }

    #[test]
    fn test_headroom() {
        assert_eq!(headroom(0.0), 1.0);
        assert!((headroom(50.0) - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_axis_has_one_slot_per_label() {
        let axis = category_axis(3);
        assert_eq!(axis.range(), -0.5..2.5);
        assert_eq!(axis.key_points(10), vec![0.0, 1.0, 2.0]);
        // The last slot ends at the right edge of the plot
        assert_eq!(axis.map(&2.5, (0, 300)), 300);
        assert_eq!(axis.map(&1.0, (0, 300)), 150);
    }

    #[test]
    fn test_single_category_fills_the_axis() {
        let axis = category_axis(1);
        assert_eq!(axis.key_points(10), vec![0.0]);
        assert_eq!(axis.map(&-0.5, (0, 200)), 0);
        assert_eq!(axis.map(&0.0, (0, 200)), 100);
        assert_eq!(axis.map(&0.5, (0, 200)), 200);
    }
}
