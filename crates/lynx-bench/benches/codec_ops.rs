//! Criterion micro-benchmarks for persistence, hashing and frame rendering.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lynx_core::{FieldId, TickId};
use lynx_render::FrameLayout;
use lynx_space::PaddedGrid;
use lynx_store::{snapshot_hash, TableCodec};
use lynx_test_utils::{grid_from_fn, MockSnapshot};

fn field_10k(offset: f64) -> PaddedGrid {
    grid_from_fn(100, |r, c| ((r * c) as f64 * 0.618 + offset) % 1.0)
}

/// Benchmark: encode one 102x102 table.
fn bench_table_encode_10k(c: &mut Criterion) {
    let g = field_10k(0.0);
    let codec = TableCodec::default();

    c.bench_function("table_encode_10k", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(256 * 1024);
            codec.encode(&mut buf, &g).unwrap();
            black_box(&buf);
        });
    });
}

/// Benchmark: decode the same table.
fn bench_table_decode_10k(c: &mut Criterion) {
    let g = field_10k(0.0);
    let codec = TableCodec::default();
    let text = codec.encode_to_string(&g);

    c.bench_function("table_decode_10k", |b| {
        b.iter(|| {
            let back = codec.decode(text.as_bytes(), "prey", g.indexing()).unwrap();
            black_box(&back);
        });
    });
}

/// Benchmark: hash two 102x102 fields.
fn bench_snapshot_hash_10k(c: &mut Criterion) {
    let mut snap = MockSnapshot::new(TickId(1));
    snap.set_field(FieldId(0), field_10k(0.0).into_vec());
    snap.set_field(FieldId(1), field_10k(0.5).into_vec());
    let fields = [FieldId(0), FieldId(1)];

    c.bench_function("snapshot_hash_10k", |b| {
        b.iter(|| {
            let h = snapshot_hash(&snap, &fields);
            black_box(h);
        });
    });
}

/// Benchmark: render one two-panel frame at 4 px per cell.
fn bench_render_frame_10k(c: &mut Criterion) {
    let prey = field_10k(0.0);
    let predator = field_10k(0.5);
    let layout = FrameLayout::new(100, 4, 500).unwrap();

    c.bench_function("render_frame_10k", |b| {
        b.iter(|| {
            let img = layout.render(&prey, &predator, 42).unwrap();
            black_box(&img);
        });
    });
}

criterion_group!(
    benches,
    bench_table_encode_10k,
    bench_table_decode_10k,
    bench_snapshot_hash_10k,
    bench_render_frame_10k
);
criterion_main!(benches);
