//! Orchestration of a run over a results directory
//!
//! Discovers `*.meta.json` descriptors, then for each algorithm in turn loads the counts,
//! builds the occupancy histogram, reports it on the console and renders its chart.
//! Any failure aborts the whole run.

use crate::analysis::{align_to_common_domain, poisson_expected, OccupancyHistogram};
use crate::common::buckets::{create_occupancy_rows, format_occupancy_table};
use crate::common::plots::{create_algorithm_plot, create_overlay_plot};
use crate::common::{AlgorithmMeta, PlotError};
use crate::parsing::{load_algorithm, ParsingError};
use crate::settings::RunSettings;
use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name suffix identifying metadata descriptors.
pub const METADATA_SUFFIX: &str = ".meta.json";

/// Errors that can occur during a run
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Results directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("No *.meta.json files found in {0}")]
    NoMetadataFiles(PathBuf),

    #[error("Failed to access results directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {0}")]
    Parsing(#[from] ParsingError),

    #[error("Plotting error: {0}")]
    Plot(#[from] PlotError),
}

type Result<T> = core::result::Result<T, DriverError>;

/// Histogram of a single algorithm, together with its descriptor.
#[derive(Debug, Clone)]
pub struct AlgorithmReport {
    pub meta: AlgorithmMeta,
    pub histogram: OccupancyHistogram,
}

/// Lists the metadata descriptors directly inside `results_dir`, sorted by path.
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - At least one descriptor path
/// * `Err(DriverError::MissingDirectory)` - If `results_dir` is not an existing directory
/// * `Err(DriverError::NoMetadataFiles)` - If no descriptor was found
pub fn discover_metadata_files(results_dir: &Path) -> Result<Vec<PathBuf>> {
    if !results_dir.is_dir() {
        return Err(DriverError::MissingDirectory(results_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(results_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_descriptor = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(METADATA_SUFFIX));

        if is_descriptor && entry.file_type()?.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(DriverError::NoMetadataFiles(results_dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

/// Loads one algorithm and reduces its counts to an occupancy histogram.
///
/// The counts array is dropped once the histogram is built.
pub fn analyze_algorithm(meta_path: &Path, max_k: Option<u32>) -> Result<AlgorithmReport> {
    let loaded = load_algorithm(meta_path)?;
    let histogram = OccupancyHistogram::from_counts(&loaded.counts, max_k);

    Ok(AlgorithmReport {
        meta: loaded.meta,
        histogram,
    })
}

/// Loads and analyzes every algorithm in the results directory without rendering.
pub fn analyze_directory(settings: &RunSettings) -> Result<Vec<AlgorithmReport>> {
    discover_metadata_files(&settings.results_dir)?
        .iter()
        .map(|meta_path| analyze_algorithm(meta_path, settings.max_k))
        .collect()
}

/// Runs the full pipeline: discovery, analysis, per-algorithm charts and optional overlay.
///
/// # Arguments
/// * `settings` - Run settings, usually built from the command line
///
/// # Returns
/// * `Ok(PathBuf)` - The directory the charts were written to
/// * `Err(DriverError)` - On the first failure; later algorithms are not processed
pub fn run(settings: &RunSettings) -> Result<PathBuf> {
    let meta_files = discover_metadata_files(&settings.results_dir)?;

    let plots_dir = settings.plots_dir();
    fs::create_dir_all(&plots_dir)?;

    let progress = progress_bar(meta_files.len());
    let mut stdout = io::stdout();
    let mut reports = Vec::with_capacity(meta_files.len());

    for meta_path in &meta_files {
        let report = analyze_algorithm(meta_path, settings.max_k)?;
        progress.set_message(report.meta.algorithm.clone());
        for line in report_lines(&report, settings.quiet) {
            print_line(&progress, &mut stdout, &line)?;
        }

        let chart_path =
            create_algorithm_plot(&report.meta, &report.histogram, &settings.plot, &plots_dir)?;
        print_line(
            &progress,
            &mut stdout,
            &format!("   🖼️  Wrote {}", chart_path.display()),
        )?;

        reports.push(report);
        progress.inc(1);
    }

    progress.finish_and_clear();

    if settings.overlay {
        let overlay_path = render_overlay(&reports, settings, &plots_dir)?;
        println!("🖼️  Wrote {}", overlay_path.display());
    }

    Ok(plots_dir)
}

/// Aligns all histograms to their smallest common maximum k and draws them together.
fn render_overlay(
    reports: &[AlgorithmReport],
    settings: &RunSettings,
    plots_dir: &Path,
) -> Result<PathBuf> {
    let histograms: Vec<OccupancyHistogram> =
        reports.iter().map(|report| report.histogram.clone()).collect();
    let aligned = align_to_common_domain(&histograms);

    let series: Vec<(&str, &OccupancyHistogram)> = reports
        .iter()
        .zip(aligned.iter())
        .map(|(report, histogram)| (report.meta.algorithm.as_str(), histogram))
        .collect();

    Ok(create_overlay_plot(&series, &settings.plot, plots_dir)?)
}

/// Console lines describing one algorithm: a summary, a dtype warning if needed, and
/// the occupancy table unless `quiet` is set.
fn report_lines(report: &AlgorithmReport, quiet: bool) -> Vec<String> {
    let mut lines = vec![describe_algorithm(report)];

    if !report.meta.has_i32_dtype() {
        lines.push(format!(
            "   ⚠️  countsDtype '{}' is not int32, reading the counts as int32",
            report.meta.counts_dtype
        ));
    }

    if !quiet {
        lines.push(occupancy_table(report));
    }

    lines
}

/// Prints above the progress bar, or straight to `out` when the bar is not drawn
/// (for example when stderr is not a terminal).
fn print_line(progress: &ProgressBar, out: &mut impl Write, line: &str) -> io::Result<()> {
    if progress.is_hidden() {
        writeln!(out, "{line}")
    } else {
        progress.println(line);
        Ok(())
    }
}

fn describe_algorithm(report: &AlgorithmReport) -> String {
    let meta = &report.meta;
    let counts_size = meta.num_buckets * core::mem::size_of::<i32>() as u64;

    format!(
        "📊 {}: {} inputs into {} buckets, λ={:.4} (counts: {})",
        meta.algorithm,
        meta.num_inputs,
        meta.num_buckets,
        meta.rate(),
        ByteSize(counts_size)
    )
}

fn occupancy_table(report: &AlgorithmReport) -> String {
    let meta = &report.meta;
    let expected = report
        .histogram
        .max_k()
        .map(|max_k| poisson_expected(max_k, meta.rate(), meta.num_buckets))
        .unwrap_or_default();

    let rows = create_occupancy_rows(&report.histogram, &expected, meta.num_buckets);
    format_occupancy_table(&rows, Some(&meta.algorithm))
}

fn progress_bar(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        progress.set_style(style);
    }
    progress
}
