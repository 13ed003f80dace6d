//! Occupancy histogram computation
//!
//! Reduces a counts-per-bucket array into "how many buckets hold exactly k items"
//! for every k from 0 up to the largest observed occupancy.

/// Frequency of each occupancy level, indexed by `k`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OccupancyHistogram {
    frequencies: Vec<u64>,
}

impl OccupancyHistogram {
    /// Builds the histogram of the given bucket counts.
    ///
    /// # Arguments
    /// * `counts` - Number of items in each bucket
    /// * `max_k` - Optional inclusive cap on the occupancy range. Levels above the cap are
    ///   dropped from the table, not folded into the last entry.
    ///
    /// # Returns
    /// A histogram covering `0..=min(max_k, max observed)`; empty if `counts` is empty.
    pub fn from_counts(counts: &[u32], max_k: Option<u32>) -> Self {
        let Some(&max_observed) = counts.iter().max() else {
            return Self::default();
        };

        // The table never grows past the cap, whatever the largest count is.
        let top = max_k.map_or(max_observed, |max_k| max_k.min(max_observed)) as usize;
        let mut frequencies = vec![0u64; top + 1];
        for &count in counts {
            if let Some(frequency) = frequencies.get_mut(count as usize) {
                *frequency += 1;
            }
        }

        Self { frequencies }
    }

    /// Creates a histogram from an existing frequency table.
    pub fn from_frequencies(frequencies: Vec<u64>) -> Self {
        Self { frequencies }
    }

    /// Returns a copy restricted to `0..=max_k`. Never pads.
    pub fn truncated(&self, max_k: u32) -> Self {
        let len = self.frequencies.len().min(max_k as usize + 1);
        Self {
            frequencies: self.frequencies[..len].to_vec(),
        }
    }

    /// Highest occupancy level in the table, `None` if the table is empty.
    pub fn max_k(&self) -> Option<u32> {
        self.frequencies.len().checked_sub(1).map(|k| k as u32)
    }

    /// Number of occupancy levels in the table.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Sum of all frequencies. Equals the bucket count for an untruncated table.
    pub fn total(&self) -> u64 {
        self.frequencies.iter().sum()
    }

    /// Occupancy levels, parallel to [`Self::frequencies`].
    pub fn k_values(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.frequencies.len()).map(|k| k as u32)
    }

    pub fn frequencies(&self) -> &[u64] {
        &self.frequencies
    }

    /// `(k, frequency)` pairs in ascending `k`.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.k_values().zip(self.frequencies.iter().copied())
    }
}
