//! Occupancy table rows and ASCII table formatting
//!
//! This module provides:
//! - [`OccupancyRow`] type comparing observed and Poisson-expected bucket counts for one `k`
//! - ASCII table formatting using the [`tabled`] crate

use crate::analysis::OccupancyHistogram;
use tabled::{Table, Tabled};

/// Observed vs. expected bucket count for a single occupancy level
#[derive(Debug, Clone, Tabled)]
pub struct OccupancyRow {
    /// Occupancy level
    #[tabled(rename = "k")]
    pub k: u32,
    /// Number of buckets holding exactly `k` items
    #[tabled(rename = "Observed")]
    pub observed: u64,
    /// Poisson-expected number of buckets, formatted
    #[tabled(rename = "Expected")]
    pub expected: String,
    /// Percentage of all buckets holding exactly `k` items
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

impl OccupancyRow {
    /// Creates a new row with formatted expected value and percentage
    pub fn new(k: u32, observed: u64, expected: f64, total: u64) -> Self {
        let percentage = if total == 0 {
            "0.00%".to_string()
        } else {
            format!("{:.2}%", (observed as f64 / total as f64) * 100.0)
        };

        Self {
            k,
            observed,
            expected: format!("{:.2}", expected),
            percentage,
        }
    }
}

/// Pairs each histogram entry with its Poisson expectation.
///
/// `expected` must cover the same k-domain as `histogram`; surplus entries are ignored.
pub fn create_occupancy_rows(
    histogram: &OccupancyHistogram,
    expected: &[f64],
    total_buckets: u64,
) -> Vec<OccupancyRow> {
    histogram
        .pairs()
        .zip(expected.iter())
        .map(|((k, observed), &expected)| OccupancyRow::new(k, observed, expected, total_buckets))
        .collect()
}

/// Formats occupancy rows as an ASCII table using the [`tabled`] crate
///
/// # Arguments
/// * `rows` - A slice of [`OccupancyRow`] to format
/// * `title` - Optional title for the table
///
/// # Returns
/// A formatted ASCII table as a [`String`]
pub fn format_occupancy_table(rows: &[OccupancyRow], title: Option<&str>) -> String {
    if rows.is_empty() {
        return "No occupancy data available".to_string();
    }

    let table = Table::new(rows).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.len()), table)
    } else {
        table
    }
}
