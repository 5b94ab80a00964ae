//! Chart composition and rendering
//!
//! A [`ChartSpec`] is the declarative description of one output chart:
//! curves (points, error bars, connectedness), axis labels, y scale, legend,
//! and artifact name. [`write_chart`] materializes it as a PNG under the
//! output directory and confirms the artifact on stdout. Curves with no
//! points are skipped here, so content-level absence can never fail a render.

use crate::record::FilterKind;
use anyhow::{Context, Result};
use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::CoordTranslate;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Fixed raster size for every artifact (matplotlib's 8x6in at 200 dpi).
pub const CHART_SIZE: (u32, u32) = (1600, 1200);

const TITLE_FONT_SIZE: u32 = 40;
const AXIS_LABEL_FONT_SIZE: u32 = 28;
const TICK_LABEL_FONT_SIZE: u32 = 22;
const LEGEND_FONT_SIZE: u32 = 24;
const MARKER_SIZE: i32 = 6;
const ERROR_BAR_HALF_WIDTH: u32 = 8;

/// Shared palette. Filter families index it through [`filter_color_index`]
/// so one family keeps one color on every chart of every report.
pub const PALETTE: &[RGBColor] = &[
    RGBColor(31, 119, 180),  // blue (blocked bloom)
    RGBColor(255, 127, 14),  // orange (cuckoo)
    RGBColor(44, 160, 44),   // green (quotient)
    RGBColor(214, 39, 40),   // red (xor)
    RGBColor(148, 103, 189), // purple
    RGBColor(140, 86, 75),   // brown
];

pub fn filter_color_index(kind: &FilterKind) -> usize {
    match kind {
        FilterKind::BlockedBloom => 0,
        FilterKind::Cuckoo => 1,
        FilterKind::Quotient => 2,
        FilterKind::Xor => 3,
        FilterKind::Other(_) => 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YScale {
    Linear,
    Log,
}

/// One plotted point: x position, y mean, and the half-length of its error
/// whisker (0 when the curve draws no error bars).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub err: f64,
}

/// One named curve on a chart.
#[derive(Debug, Clone)]
pub struct Curve {
    pub label: String,
    pub color_index: usize,
    pub points: Vec<DataPoint>,
    pub error_bars: bool,
    /// Line through the points; false renders markers only (discrete
    /// configuration choices rather than a swept variable).
    pub connect: bool,
}

/// Declarative description of one output chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// Artifact stem; the sink appends `.png`.
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_scale: YScale,
    pub legend: bool,
    pub curves: Vec<Curve>,
}

impl ChartSpec {
    pub fn has_data(&self) -> bool {
        self.curves.iter().any(|curve| !curve.points.is_empty())
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}

/// Render `spec` and write it under `output_dir`.
///
/// Naming is deterministic, so re-running a report overwrites the previous
/// artifact instead of accumulating new ones.
pub fn write_chart(spec: &ChartSpec, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(spec.file_name());
    render(spec, &path).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Saved {}", spec.file_name());
    Ok(path)
}

fn render(spec: &ChartSpec, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = x_range(spec);
    match spec.y_scale {
        YScale::Linear => {
            let (y_min, y_max) = y_range_linear(spec);
            let mut chart = chart_builder(&root, spec)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
            configure_mesh(&mut chart, spec)?;
            draw_curves(&mut chart, spec, f64::NEG_INFINITY)?;
        }
        YScale::Log => {
            let (y_min, y_max) = y_range_log(spec);
            let mut chart = chart_builder(&root, spec)
                .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())?;
            configure_mesh(&mut chart, spec)?;
            // On a log axis a whisker must not cross zero; clamp it to the
            // bottom of the plotted range.
            draw_curves(&mut chart, spec, y_min)?;
        }
    }

    root.present()?;
    Ok(())
}

fn chart_builder<'a, 'b>(
    root: &'a DrawingArea<BitMapBackend<'b>, plotters::coord::Shift>,
    spec: &ChartSpec,
) -> ChartBuilder<'a, 'b, BitMapBackend<'b>> {
    let mut builder = ChartBuilder::on(root);
    builder
        .caption(&spec.title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(24)
        .x_label_area_size(80)
        .y_label_area_size(110);
    builder
}

fn configure_mesh<Y>(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, Y>>,
    spec: &ChartSpec,
) -> Result<()>
where
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    chart
        .configure_mesh()
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.04))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;
    Ok(())
}

fn draw_curves<'a, CT>(
    chart: &mut ChartContext<'a, BitMapBackend<'a>, CT>,
    spec: &ChartSpec,
    whisker_floor: f64,
) -> Result<()>
where
    CT: CoordTranslate<From = (f64, f64)>,
{
    for curve in &spec.curves {
        if curve.points.is_empty() {
            continue;
        }
        let color = PALETTE[curve.color_index % PALETTE.len()];

        if curve.connect {
            chart
                .draw_series(LineSeries::new(
                    curve.points.iter().map(|p| (p.x, p.y)),
                    color.stroke_width(3),
                ))?
                .label(curve.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(3))
                });
            chart.draw_series(
                curve
                    .points
                    .iter()
                    .map(|p| Circle::new((p.x, p.y), MARKER_SIZE, color.filled())),
            )?;
        } else {
            chart
                .draw_series(
                    curve
                        .points
                        .iter()
                        .map(|p| Circle::new((p.x, p.y), MARKER_SIZE, color.filled())),
                )?
                .label(curve.label.as_str())
                .legend(move |(x, y)| Circle::new((x + 12, y), MARKER_SIZE, color.filled()));
        }

        if curve.error_bars {
            chart.draw_series(curve.points.iter().map(|p| {
                ErrorBar::new_vertical(
                    p.x,
                    (p.y - p.err).max(whisker_floor),
                    p.y,
                    p.y + p.err,
                    color.stroke_width(2),
                    ERROR_BAR_HALF_WIDTH,
                )
            }))?;
        }
    }

    if spec.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", LEGEND_FONT_SIZE))
            .draw()?;
    }
    Ok(())
}

fn points(spec: &ChartSpec) -> impl Iterator<Item = &DataPoint> {
    spec.curves.iter().flat_map(|curve| curve.points.iter())
}

fn x_range(spec: &ChartSpec) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for p in points(spec) {
        min = min.min(p.x);
        max = max.max(p.x);
    }
    if min > max {
        return (0.0, 1.0);
    }
    pad_range(min, max)
}

fn y_range_linear(spec: &ChartSpec) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for p in points(spec) {
        min = min.min(p.y - p.err);
        max = max.max(p.y + p.err);
    }
    if min > max {
        return (0.0, 1.0);
    }
    pad_range(min, max)
}

fn y_range_log(spec: &ChartSpec) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for p in points(spec) {
        if p.y <= 0.0 {
            continue;
        }
        // Keep the whisker bottom on-axis even when std exceeds the mean.
        let low = (p.y - p.err).max(p.y * 0.1);
        min = min.min(low);
        max = max.max(p.y + p.err);
    }
    if min > max {
        return (1e-6, 1.0);
    }
    (min * 0.5, max * 2.0)
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        let pad = (min.abs() * 0.1).max(0.5);
        return (min - pad, max + pad);
    }
    let pad = span * 0.05;
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_points(points: Vec<DataPoint>, y_scale: YScale) -> ChartSpec {
        ChartSpec {
            name: "test_chart".to_string(),
            title: "t".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            y_scale,
            legend: false,
            curves: vec![Curve {
                label: "c".to_string(),
                color_index: 0,
                points,
                error_bars: true,
                connect: true,
            }],
        }
    }

    #[test]
    fn test_file_name_is_deterministic() {
        let spec = spec_with_points(vec![], YScale::Linear);
        assert_eq!(spec.file_name(), "test_chart.png");
        assert_eq!(spec.file_name(), "test_chart.png");
    }

    #[test]
    fn test_has_data_requires_a_nonempty_curve() {
        let empty = spec_with_points(vec![], YScale::Linear);
        assert!(!empty.has_data());
        let filled = spec_with_points(
            vec![DataPoint {
                x: 0.5,
                y: 2.0,
                err: 0.1,
            }],
            YScale::Linear,
        );
        assert!(filled.has_data());
    }

    #[test]
    fn test_linear_range_covers_error_whiskers() {
        let spec = spec_with_points(
            vec![
                DataPoint {
                    x: 0.0,
                    y: 1.0,
                    err: 0.5,
                },
                DataPoint {
                    x: 1.0,
                    y: 3.0,
                    err: 0.5,
                },
            ],
            YScale::Linear,
        );
        let (lo, hi) = y_range_linear(&spec);
        assert!(lo < 0.5);
        assert!(hi > 3.5);
    }

    #[test]
    fn test_log_range_stays_positive() {
        let spec = spec_with_points(
            vec![DataPoint {
                x: 10.0,
                y: 0.01,
                err: 0.05,
            }],
            YScale::Log,
        );
        let (lo, hi) = y_range_log(&spec);
        assert!(lo > 0.0);
        assert!(hi > 0.01);
    }

    #[test]
    fn test_degenerate_x_range_widens() {
        let spec = spec_with_points(
            vec![DataPoint {
                x: 4.0,
                y: 1.0,
                err: 0.0,
            }],
            YScale::Linear,
        );
        let (lo, hi) = x_range(&spec);
        assert!(lo < 4.0);
        assert!(hi > 4.0);
    }

    #[test]
    fn test_filter_colors_are_stable() {
        use crate::record::FilterKind;
        assert_eq!(filter_color_index(&FilterKind::BlockedBloom), 0);
        assert_eq!(filter_color_index(&FilterKind::Cuckoo), 1);
        assert_eq!(filter_color_index(&FilterKind::Quotient), 2);
        assert_eq!(filter_color_index(&FilterKind::Xor), 3);
    }
}
