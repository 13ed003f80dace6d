//! Plotting infrastructure for occupancy histogram charts
//!
//! This module provides functionality to create per-algorithm occupancy bar charts
//! (with an optional Poisson expectation curve) and a combined overlay line chart
//! using the [`plotters`] crate. Charts are saved as PNG files with fixed 1200x800 resolution.

use crate::analysis::{normalize, poisson_expected, OccupancyHistogram};
use crate::common::data_structures::AlgorithmMeta;
use crate::settings::PlotOptions;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the combined comparison chart.
pub const OVERLAY_FILE_NAME: &str = "hist_overlay.png";

/// Chart resolution in pixels.
const CHART_SIZE: (u32, u32) = (1200, 800);

/// Half of the width of a single occupancy bar, in k units.
const BAR_HALF_WIDTH: f64 = 0.4;

/// Upper bound on the number of labelled ticks along the k axis.
const MAX_K_LABELS: usize = 25;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Everything needed to draw one per-algorithm chart.
struct OccupancyChart {
    title: String,
    observed: Vec<(f64, f64)>,
    expected: Option<Vec<(f64, f64)>>,
    max_k: u32,
}

/// One line of the overlay chart.
struct OverlayLine<'a> {
    name: &'a str,
    points: Vec<(f64, f64)>,
}

/// Replaces every character that is neither alphanumeric nor one of `. _ -` with `_`.
///
/// Unicode letters and digits are kept as they are.
pub fn sanitize_algorithm_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File name of the chart for a single algorithm, `hist_<sanitized>.png`.
pub fn algorithm_plot_file_name(algorithm: &str) -> String {
    format!("hist_{}.png", sanitize_algorithm_name(algorithm))
}

/// Computes the y-axis range for a chart.
///
/// On a linear axis the range starts at zero. On a logarithmic axis the lower bound sits
/// half a step below the smallest positive value in `floor_values`, since zero cannot be shown.
///
/// # Arguments
/// * `floor_values` - Values that must remain visible above the lower bound
/// * `all_values` - Every value drawn on the chart, used for the upper bound
/// * `log_y` - Whether the axis is logarithmic
///
/// # Returns
/// A `(min, max)` tuple with `min < max`.
fn y_bounds(floor_values: &[f64], all_values: &[f64], log_y: bool) -> (f64, f64) {
    let y_max = all_values.iter().copied().fold(0.0, f64::max);

    if !log_y {
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
        return (0.0, y_max);
    }

    let smallest_positive = floor_values
        .iter()
        .copied()
        .filter(|&v| v > 0.0)
        .fold(f64::INFINITY, f64::min);

    let y_min = if smallest_positive.is_finite() {
        smallest_positive * 0.5
    } else {
        0.5
    };

    // Fix edge case: an empty or all-zero chart still needs a valid range
    let y_max = (y_max * 2.0).max(y_min * 10.0);
    (y_min, y_max)
}

/// Tick label for the k axis; only whole occupancy levels are labelled.
fn format_k_label(x: &f64) -> String {
    if (x - x.round()).abs() < 1e-6 {
        format!("{:.0}", x)
    } else {
        String::new()
    }
}

fn format_y_label(y: &f64) -> String {
    if y.abs() >= 1.0 || *y == 0.0 {
        format!("{:.0}", y)
    } else {
        format!("{:.1e}", y)
    }
}

fn drawing<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Creates the occupancy bar chart for a single algorithm and saves it as a PNG file
///
/// Observed frequencies are drawn as bars. Unless disabled in `options`, the expected
/// frequencies under a Poisson distribution with λ = numInputs / numBuckets and
/// N = numBuckets are drawn on top as a line with markers.
///
/// # Arguments
/// * `meta` - Descriptor of the algorithm; provides the name, input and bucket counts
/// * `histogram` - Observed occupancy histogram, possibly truncated
/// * `options` - Plot options (log axis, Poisson curve)
/// * `output_dir` - Directory where the PNG file should be saved
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the written `hist_<sanitized>.png`
/// * `Err(PlotError)` - If the histogram is empty or drawing failed
///
/// # Chart Properties
/// * Resolution: 1200x800 pixels
/// * Format: PNG
/// * X-axis: occupancy level k
/// * Y-axis: number of buckets, linear or logarithmic (base 10)
/// * Caption: algorithm name, input count, bucket count and λ
pub fn create_algorithm_plot(
    meta: &AlgorithmMeta,
    histogram: &OccupancyHistogram,
    options: &PlotOptions,
    output_dir: &Path,
) -> Result<PathBuf> {
    let max_k = histogram.max_k().ok_or_else(|| {
        PlotError::InvalidData(format!("Histogram for '{}' is empty", meta.algorithm))
    })?;

    let observed: Vec<(f64, f64)> = histogram
        .pairs()
        .map(|(k, frequency)| (k as f64, frequency as f64))
        .collect();

    let expected = options.show_poisson.then(|| {
        poisson_expected(max_k, meta.rate(), meta.num_buckets)
            .into_iter()
            .enumerate()
            .map(|(k, value)| (k as f64, value))
            .collect()
    });

    let chart = OccupancyChart {
        title: format!(
            "{}  (inputs={}, buckets={}, λ={:.4})",
            meta.algorithm,
            meta.num_inputs,
            meta.num_buckets,
            meta.rate()
        ),
        observed,
        expected,
        max_k,
    };

    let output_path = output_dir.join(algorithm_plot_file_name(&meta.algorithm));
    create_headless_occupancy_plot(&chart, options.log_y, &output_path)?;
    Ok(output_path)
}

/// Draws an [`OccupancyChart`] with the bitmap backend.
///
/// The drawing area is dropped as soon as the chart is presented, so no rendering
/// resources outlive a single chart.
fn create_headless_occupancy_plot(
    chart: &OccupancyChart,
    log_y: bool,
    output_path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, CHART_SIZE);
    let drawing_area = root.into_drawing_area();

    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let observed_values: Vec<f64> = chart.observed.iter().map(|&(_, y)| y).collect();
    let mut all_values = observed_values.clone();
    if let Some(expected) = &chart.expected {
        all_values.extend(expected.iter().map(|&(_, y)| y));
    }
    let (y_min, y_max) = y_bounds(&observed_values, &all_values, log_y);
    let x_range = -0.5..(chart.max_k as f64 + 0.5);

    let mut builder = ChartBuilder::on(&drawing_area);
    builder
        .caption(&chart.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85);

    if log_y {
        let mut context = builder
            .build_cartesian_2d(x_range, (y_min..y_max).log_scale())
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;
        draw_occupancy_series(&mut context, chart, y_min, true)?;
    } else {
        let mut context = builder
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;
        draw_occupancy_series(&mut context, chart, y_min, false)?;
    }

    // Ensure everything is properly rendered and saved
    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Draws mesh, bars, the optional Poisson curve and the legend onto a chart context.
///
/// Generic over the y coordinate so the same code serves linear and logarithmic axes.
/// `baseline` is the y value bars grow from.
fn draw_occupancy_series<'a, DB, Y>(
    context: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    chart: &OccupancyChart,
    baseline: f64,
    log_y: bool,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let mut mesh = context.configure_mesh();
    mesh.x_desc("Items per bucket (k)")
        .x_labels((chart.max_k as usize + 1).min(MAX_K_LABELS))
        .x_label_formatter(&format_k_label)
        .y_desc("Number of buckets")
        .y_label_formatter(&format_y_label)
        .axis_desc_style(("sans-serif", 35))
        .label_style(("sans-serif", 25));
    mesh.draw().map_err(drawing)?;

    let bar_style = BLUE.mix(0.6).filled();
    context
        .draw_series(
            chart
                .observed
                .iter()
                .filter(|&&(_, y)| !log_y || y > 0.0)
                .map(|&(k, y)| {
                    Rectangle::new(
                        [(k - BAR_HALF_WIDTH, baseline), (k + BAR_HALF_WIDTH, y)],
                        bar_style,
                    )
                }),
        )
        .map_err(drawing)?
        .label("Observed")
        .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 20, y + 6)], bar_style));

    if let Some(expected) = &chart.expected {
        // Tail expectations can fall far below the smallest observed bar on a log axis
        let points: Vec<(f64, f64)> = expected
            .iter()
            .copied()
            .filter(|&(_, y)| !log_y || y >= baseline)
            .collect();

        context
            .draw_series(LineSeries::new(points.iter().copied(), RED.stroke_width(2)))
            .map_err(drawing)?
            .label("Poisson expectation")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        context
            .draw_series(points.iter().map(|&point| Circle::new(point, 4, RED.filled())))
            .map_err(drawing)?;
    }

    context
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 25))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(drawing)?;

    Ok(())
}

/// Creates the combined overlay chart of several algorithms and saves it as a PNG file
///
/// Each algorithm is drawn as one line over the shared k-domain. When
/// `options.normalize_overlay` is set, each line shows the fraction of that algorithm's
/// buckets at each k (frequency divided by the table's frequency sum), so tables with
/// different bucket counts remain comparable. No Poisson curve is drawn.
///
/// # Arguments
/// * `series` - `(algorithm name, histogram)` pairs, already aligned to a common k-domain
/// * `options` - Plot options (log axis, normalization)
/// * `output_dir` - Directory where `hist_overlay.png` should be saved
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the written overlay chart
/// * `Err(PlotError)` - If there is nothing to draw or drawing failed
pub fn create_overlay_plot(
    series: &[(&str, &OccupancyHistogram)],
    options: &PlotOptions,
    output_dir: &Path,
) -> Result<PathBuf> {
    if series.is_empty() {
        return Err(PlotError::InvalidData(
            "Overlay needs at least one algorithm".to_string(),
        ));
    }

    let mut max_k = 0u32;
    let mut lines = Vec::with_capacity(series.len());
    for &(name, histogram) in series {
        let line_max_k = histogram.max_k().ok_or_else(|| {
            PlotError::InvalidData(format!("Histogram for '{}' is empty", name))
        })?;
        max_k = max_k.max(line_max_k);

        let values: Vec<f64> = if options.normalize_overlay {
            normalize(histogram)
        } else {
            histogram.frequencies().iter().map(|&f| f as f64).collect()
        };

        lines.push(OverlayLine {
            name,
            points: values
                .into_iter()
                .enumerate()
                .map(|(k, value)| (k as f64, value))
                .collect(),
        });
    }

    let output_path = output_dir.join(OVERLAY_FILE_NAME);
    create_headless_overlay_plot(&lines, max_k, options, &output_path)?;
    Ok(output_path)
}

fn create_headless_overlay_plot(
    lines: &[OverlayLine],
    max_k: u32,
    options: &PlotOptions,
    output_path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, CHART_SIZE);
    let drawing_area = root.into_drawing_area();

    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let values: Vec<f64> = lines
        .iter()
        .flat_map(|line| line.points.iter().map(|&(_, y)| y))
        .collect();
    let (y_min, y_max) = y_bounds(&values, &values, options.log_y);
    let x_range = -0.5..(max_k as f64 + 0.5);

    let mut builder = ChartBuilder::on(&drawing_area);
    builder
        .caption("Bucket occupancy by algorithm", ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85);

    if options.log_y {
        let mut context = builder
            .build_cartesian_2d(x_range, (y_min..y_max).log_scale())
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;
        draw_overlay_series(&mut context, lines, max_k, options)?;
    } else {
        let mut context = builder
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;
        draw_overlay_series(&mut context, lines, max_k, options)?;
    }

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

fn draw_overlay_series<'a, DB, Y>(
    context: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    lines: &[OverlayLine],
    max_k: u32,
    options: &PlotOptions,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let y_desc = if options.normalize_overlay {
        "Fraction of buckets"
    } else {
        "Number of buckets"
    };

    let mut mesh = context.configure_mesh();
    mesh.x_desc("Items per bucket (k)")
        .x_labels((max_k as usize + 1).min(MAX_K_LABELS))
        .x_label_formatter(&format_k_label)
        .y_desc(y_desc)
        .y_label_formatter(&format_y_label)
        .axis_desc_style(("sans-serif", 35))
        .label_style(("sans-serif", 25));
    mesh.draw().map_err(drawing)?;

    for (index, line) in lines.iter().enumerate() {
        let color = Palette99::pick(index).to_rgba();
        let points: Vec<(f64, f64)> = line
            .points
            .iter()
            .copied()
            .filter(|&(_, y)| !options.log_y || y > 0.0)
            .collect();

        context
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(drawing)?
            .label(line.name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        context
            .draw_series(points.iter().map(|&point| Circle::new(point, 3, color.filled())))
            .map_err(drawing)?;
    }

    context
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 25))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(drawing)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn meta(algorithm: &str, buckets: u64, inputs: u64) -> AlgorithmMeta {
        AlgorithmMeta {
            algorithm: algorithm.to_string(),
            num_buckets: buckets,
            num_inputs: inputs,
            counts_file: format!("{algorithm}.bin"),
            counts_dtype: "int32".to_string(),
            endianness: Some("little".to_string()),
        }
    }

    #[rstest(name, expected,
        case("murmur3", "murmur3"),
        case("xxh3-64", "xxh3-64"),
        case("fnv_1a.v2", "fnv_1a.v2"),
        case("sha256/truncated", "sha256_truncated"),
        case("crc 32 (poly)", "crc_32__poly_"),
        case("λhash", "λhash"),
        case("hash٣", "hash٣"),
        case("a→b", "a_b")
    )]
    fn sanitizes_algorithm_names(name: &str, expected: &str) {
        assert_eq!(sanitize_algorithm_name(name), expected);
    }

    #[test]
    fn plot_file_name_uses_sanitized_algorithm() {
        assert_eq!(algorithm_plot_file_name("city/64"), "hist_city_64.png");
    }

    #[test]
    fn linear_bounds_start_at_zero() {
        let (min, max) = y_bounds(&[0.0, 10.0], &[0.0, 10.0, 3.7], false);
        assert_eq!(min, 0.0);
        assert!((max - 11.0).abs() < 1e-9);
    }

    #[test]
    fn linear_bounds_for_all_zero_data() {
        assert_eq!(y_bounds(&[0.0], &[0.0], false), (0.0, 1.0));
    }

    #[test]
    fn log_bounds_skip_zero_values() {
        let (min, max) = y_bounds(&[0.0, 4.0, 100.0], &[0.0, 4.0, 100.0], true);
        assert_eq!(min, 2.0);
        assert_eq!(max, 200.0);
    }

    #[test]
    fn log_bounds_for_all_zero_data_are_valid() {
        let (min, max) = y_bounds(&[0.0], &[0.0], true);
        assert!(min > 0.0);
        assert!(max > min);
    }

    #[test]
    fn k_labels_only_on_whole_levels() {
        assert_eq!(format_k_label(&3.0), "3");
        assert_eq!(format_k_label(&2.5), "");
    }

    #[test]
    fn empty_histogram_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = create_algorithm_plot(
            &meta("empty", 1, 1),
            &OccupancyHistogram::default(),
            &PlotOptions::default(),
            temp_dir.path(),
        );
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    fn empty_overlay_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = create_overlay_plot(&[], &PlotOptions::default(), temp_dir.path());
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        let empty = OccupancyHistogram::default();
        let result =
            create_overlay_plot(&[("empty", &empty)], &PlotOptions::default(), temp_dir.path());
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[rstest(log_y, show_poisson,
        case(false, true),
        case(true, true),
        case(false, false),
        case(true, false)
    )]
    #[ignore = "Font rendering not available in test environment"]
    fn test_create_algorithm_plot_success(log_y: bool, show_poisson: bool) {
        let temp_dir = TempDir::new().unwrap();
        let histogram = OccupancyHistogram::from_frequencies(vec![370, 365, 185, 60, 15, 4, 1]);
        let options = PlotOptions {
            log_y,
            show_poisson,
            ..PlotOptions::default()
        };

        let path =
            create_algorithm_plot(&meta("wy/hash", 1000, 1000), &histogram, &options, temp_dir.path())
                .unwrap();

        assert_eq!(path, temp_dir.path().join("hist_wy_hash.png"));
        assert!(path.exists());
    }

    #[rstest(log_y, normalize_overlay,
        case(false, true),
        case(true, true),
        case(false, false)
    )]
    #[ignore = "Font rendering not available in test environment"]
    fn test_create_overlay_plot_success(log_y: bool, normalize_overlay: bool) {
        let temp_dir = TempDir::new().unwrap();
        let a = OccupancyHistogram::from_frequencies(vec![40, 35, 20, 5]);
        let b = OccupancyHistogram::from_frequencies(vec![400, 360, 190, 50]);
        let options = PlotOptions {
            log_y,
            normalize_overlay,
            ..PlotOptions::default()
        };

        let path = create_overlay_plot(&[("a", &a), ("b", &b)], &options, temp_dir.path()).unwrap();

        assert_eq!(path, temp_dir.path().join(OVERLAY_FILE_NAME));
        assert!(path.exists());
    }
}
