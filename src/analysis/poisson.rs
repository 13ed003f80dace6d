//! Theoretical occupancy under uniform random hashing
//!
//! With `n` items thrown uniformly into `N` buckets, the occupancy of a bucket is
//! approximately Poisson distributed with rate λ = n / N, so the expected number of
//! buckets holding exactly `k` items is `N·λ^k·e^(−λ)/k!`.

/// Average occupancy per bucket (λ).
///
/// Returns `0.0` when there are no buckets.
pub fn occupancy_rate(num_inputs: u64, num_buckets: u64) -> f64 {
    if num_buckets == 0 {
        return 0.0;
    }

    num_inputs as f64 / num_buckets as f64
}

/// Expected number of buckets holding exactly `k` items, for `k` in `0..=max_k`.
///
/// Uses the recurrence `e(0) = N·e^(−λ)`, `e(k+1) = e(k)·λ/(k+1)` so that no factorial
/// or raw power is ever formed.
///
/// # Arguments
/// * `max_k` - Highest occupancy level to compute (inclusive)
/// * `lambda` - Poisson rate, must be non-negative
/// * `num_buckets` - Total bucket count `N`
///
/// # Returns
/// A vector of `max_k + 1` expected frequencies.
pub fn poisson_expected(max_k: u32, lambda: f64, num_buckets: u64) -> Vec<f64> {
    let mut expected = Vec::with_capacity(max_k as usize + 1);
    let mut current = num_buckets as f64 * (-lambda).exp();
    expected.push(current);

    for k in 0..max_k {
        current *= lambda / (k + 1) as f64;
        expected.push(current);
    }

    expected
}
