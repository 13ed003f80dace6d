//! # Hash Occupancy Plots
//! Turns per-bucket occupancy counts produced by hash quality tests into occupancy
//! histograms, compares them against the Poisson distribution expected from a uniform
//! hash, and renders the result as PNG charts.

/// Statistical analysis: occupancy histograms, Poisson expectations and overlay alignment.
pub mod analysis;

/// Shared infrastructure: descriptor types, console tables and chart rendering.
pub mod common;

/// Discovery of descriptors and orchestration of a full run.
pub mod driver;

/// Loading of `<ALG>.meta.json` descriptors and their raw counts arrays.
pub mod parsing;

/// Run and chart options shared by the command line and the library entry points.
pub mod settings;

pub mod prelude {
    pub use crate::analysis::{
        align_to_common_domain, normalize, occupancy_rate, poisson_expected, OccupancyHistogram,
    };
    pub use crate::common::{AlgorithmMeta, Endianness, PlotError};
    pub use crate::driver::{analyze_directory, run, AlgorithmReport, DriverError};
    pub use crate::parsing::{load_algorithm, LoadedAlgorithm, ParsingError};
    pub use crate::settings::{PlotOptions, RunSettings};
}
