//! # Spatial Hash Benchmark
//!
//! Frame-shaped workloads: move every entity, then run broad-phase queries.
//!
//! Run with: `cargo bench --package kiln_spatial`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kiln_spatial::{PositionUpdate, SpatialHash};
use rand::{rngs::StdRng, Rng, SeedableRng};

const WORLD: f32 = 4096.0;

fn populated(count: u32) -> SpatialHash {
    let mut hash = SpatialHash::new(64.0);
    let mut rng = StdRng::seed_from_u64(0x4B49_4C4E);
    for id in 0..count {
        hash.upsert(
            id,
            rng.gen_range(0.0..WORLD),
            rng.gen_range(0.0..WORLD),
            rng.gen_range(4.0..24.0),
            id % 4,
        );
    }
    hash
}

fn bench_batch_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_update_positions");
    for count in [1_000u32, 10_000] {
        let mut hash = populated(count);
        let mut rng = StdRng::seed_from_u64(7);
        let updates: Vec<PositionUpdate> = (0..count)
            .map(|id| PositionUpdate::new(id, rng.gen_range(0.0..WORLD), rng.gen_range(0.0..WORLD)))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &updates, |b, updates| {
            b.iter(|| hash.batch_update_positions(black_box(updates)));
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let hash = populated(10_000);

    c.bench_function("query_radius_128", |b| {
        b.iter(|| black_box(hash.query_radius(black_box(2048.0), black_box(2048.0), 128.0)));
    });

    let mut out = Vec::with_capacity(64);
    c.bench_function("query_at_excluding_group_into", |b| {
        b.iter(|| {
            hash.query_at_excluding_group_into(black_box(1000.0), black_box(1000.0), 0, &mut out);
            black_box(out.len())
        });
    });
}

fn bench_collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_all_collisions");
    for count in [1_000u32, 5_000] {
        let hash = populated(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &hash, |b, hash| {
            b.iter(|| black_box(hash.detect_all_collisions()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_batch_update, bench_queries, bench_collisions);
criterion_main!(benches);
