//! Criterion micro-benchmarks for the lattice kernels.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lynx_propagators::laplacian;
use lynx_space::{synchronize, GridIndexing, PaddedGrid};
use lynx_test_utils::grid_from_fn;

fn field_10k() -> PaddedGrid {
    let mut g = grid_from_fn(100, |r, c| ((r * 31 + c * 17) % 100) as f64 / 100.0);
    synchronize(&mut g);
    g
}

/// Benchmark: mirror the ghost ring of a 100x100 slice.
fn bench_synchronize_10k(c: &mut Criterion) {
    let mut g = field_10k();

    c.bench_function("synchronize_10k", |b| {
        b.iter(|| {
            synchronize(&mut g);
            black_box(g.as_slice());
        });
    });
}

/// Benchmark: 5-point Laplacian over a 100x100 interior.
fn bench_laplacian_10k(c: &mut Criterion) {
    let g = field_10k();
    let ix: GridIndexing = g.indexing();
    let mut out = vec![0.0; ix.cell_count()];

    c.bench_function("laplacian_10k", |b| {
        b.iter(|| {
            laplacian(ix, g.as_slice(), &mut out);
            black_box(&out);
        });
    });
}

/// Benchmark: neighbour lookup for every interior cell.
fn bench_neighbours_10k(c: &mut Criterion) {
    let ix = GridIndexing::new(100).unwrap();

    c.bench_function("neighbours_10k", |b| {
        b.iter(|| {
            for (r, col) in ix.interior() {
                let n = ix.neighbours_flat(ix.index(r, col));
                black_box(&n);
            }
        });
    });
}

criterion_group!(
    benches,
    bench_synchronize_10k,
    bench_laplacian_10k,
    bench_neighbours_10k
);
criterion_main!(benches);
