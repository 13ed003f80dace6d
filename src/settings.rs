use std::path::{Path, PathBuf};

/// Name of the directory, under the results directory, that receives rendered charts.
pub const PLOTS_DIR_NAME: &str = "plots";

/// Options controlling how individual charts are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    /// Draw the y-axis on a logarithmic scale
    pub log_y: bool,
    /// Overlay the Poisson expectation on per-algorithm charts
    pub show_poisson: bool,
    /// Plot fractions of total buckets instead of raw frequencies on the overlay chart
    pub normalize_overlay: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            log_y: false,
            show_poisson: true,
            normalize_overlay: true,
        }
    }
}

/// Settings for a single run over a results directory.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Directory holding the `<ALG>.meta.json` / counts pairs
    pub results_dir: PathBuf,
    /// Inclusive cap on the displayed occupancy range; `None` shows everything observed
    pub max_k: Option<u32>,
    /// Also render a combined chart of all algorithms
    pub overlay: bool,
    /// Skip the per-algorithm occupancy tables on the console
    pub quiet: bool,
    pub plot: PlotOptions,
}

impl RunSettings {
    /// Creates settings with default options for the given results directory.
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
            max_k: None,
            overlay: false,
            quiet: false,
            plot: PlotOptions::default(),
        }
    }

    /// Directory the charts are written to.
    pub fn plots_dir(&self) -> PathBuf {
        plots_dir_for(&self.results_dir)
    }
}

/// Directory the charts for `results_dir` are written to.
pub fn plots_dir_for(results_dir: &Path) -> PathBuf {
    results_dir.join(PLOTS_DIR_NAME)
}
