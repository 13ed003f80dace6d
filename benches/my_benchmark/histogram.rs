use criterion::{black_box, Criterion};
use hash_occupancy_plots::analysis::OccupancyHistogram;

/// Deterministic pseudo-random occupancy counts with a Poisson-like spread around `mean`.
fn make_counts(buckets: usize, mean: u32) -> Vec<u32> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    (0..buckets)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % (mean as u64 * 2 + 1)) as u32
        })
        .collect()
}

pub fn bench_histogram_from_counts(c: &mut Criterion) {
    for &buckets in &[1 << 16, 1 << 20, 1 << 22] {
        let counts = make_counts(buckets, 4);
        let id = &format!("histogram_from_counts_{}", buckets);
        c.bench_function(id, |b| {
            b.iter(|| OccupancyHistogram::from_counts(black_box(&counts), None))
        });
    }
}

pub fn bench_histogram_truncated(c: &mut Criterion) {
    let counts = make_counts(1 << 20, 16);
    c.bench_function("histogram_from_counts_max_k_8", |b| {
        b.iter(|| OccupancyHistogram::from_counts(black_box(&counts), Some(8)))
    });
}
