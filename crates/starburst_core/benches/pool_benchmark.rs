//! Spark pool benchmarks.
//!
//! TARGET: a full 5000-slot step well inside a 16ms frame.
//!
//! Run with: cargo bench --package starburst_core --bench pool_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starburst_core::{SparkConfig, SparkDesc, SparkKind, SparkPool, MAX_SPARKS};
use starburst_math::{Matrix, Vec3};

fn saturated_pool() -> SparkPool {
    let mut pool = SparkPool::new(MAX_SPARKS, SparkConfig::default());
    for i in 0..MAX_SPARKS {
        let x = (i % 100) as f64 - 50.0;
        pool.spawn(
            SparkDesc::new(SparkKind::Spark, 1.0e6, 10.0)
                .at(Vec3::new(x, 0.0, -x))
                .moving(Vec3::new(1.0, 20.0, -1.0))
                .colored([0.9, 0.4, 0.1]),
        );
    }
    pool
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_step");
    group.throughput(Throughput::Elements(MAX_SPARKS as u64));

    let mut pool = saturated_pool();
    let _ = pool.set_billboard(Matrix::rotation_y(-0.3));
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    group.bench_function("step_5000_live", |b| {
        b.iter(|| pool.step(black_box(1.0 / 60.0), &mut rng))
    });
    group.finish();
}

fn bench_spawn(c: &mut Criterion) {
    let mut pool = saturated_pool();

    c.bench_function("spawn_preempt_full_pool", |b| {
        b.iter(|| pool.spawn(black_box(SparkDesc::new(SparkKind::Ember, 1.0, 4.0))))
    });
}

criterion_group!(benches, bench_step, bench_spawn);
criterion_main!(benches);
