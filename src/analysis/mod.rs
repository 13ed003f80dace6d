//! Statistical analysis of bucket occupancy
//!
//! This module contains:
//! - Occupancy histogram computation
//! - Poisson expected frequencies
//! - Alignment and normalization for overlay charts

pub mod histogram;
pub mod overlay;
pub mod poisson;

// Re-export analysis functions for convenience
pub use histogram::OccupancyHistogram;
pub use overlay::{align_to_common_domain, normalize};
pub use poisson::{occupancy_rate, poisson_expected};
