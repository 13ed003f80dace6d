//! Preparation of several histograms for a combined comparison chart

use super::histogram::OccupancyHistogram;

/// Truncates every histogram to the smallest maximum occupancy among them.
///
/// Longer tails are discarded so that all tables share `0..=common_max`. No table is padded.
/// Empty tables contribute nothing to the common domain.
pub fn align_to_common_domain(histograms: &[OccupancyHistogram]) -> Vec<OccupancyHistogram> {
    let Some(common_max) = histograms.iter().filter_map(|h| h.max_k()).min() else {
        return histograms.to_vec();
    };

    histograms.iter().map(|h| h.truncated(common_max)).collect()
}

/// Frequencies as a fraction of the table's own total.
///
/// Yields all zeros for a table whose frequencies sum to zero.
pub fn normalize(histogram: &OccupancyHistogram) -> Vec<f64> {
    let total = histogram.total();
    if total == 0 {
        return vec![0.0; histogram.len()];
    }

    histogram
        .frequencies()
        .iter()
        .map(|&f| f as f64 / total as f64)
        .collect()
}
