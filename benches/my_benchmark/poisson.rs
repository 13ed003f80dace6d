use criterion::{black_box, Criterion};
use hash_occupancy_plots::analysis::poisson_expected;

pub fn bench_poisson_expected(c: &mut Criterion) {
    for &max_k in &[32u32, 1024, 65536] {
        let id = &format!("poisson_expected_{}", max_k);
        c.bench_function(id, |b| {
            b.iter(|| poisson_expected(black_box(max_k), black_box(4.0), black_box(1 << 20)))
        });
    }
}
