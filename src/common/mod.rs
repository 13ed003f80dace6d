//! Common infrastructure modules shared by the loader, analysis and driver
//!
//! This module provides reusable infrastructure for:
//! - Occupancy table rows and ASCII table formatting
//! - Data structures for algorithm descriptors
//! - Plotting occupancy and overlay charts

pub mod buckets;
pub mod data_structures;
pub mod plots;

// Re-export commonly used items
pub use data_structures::{AlgorithmMeta, Endianness};
pub use plots::PlotError;
