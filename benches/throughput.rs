//! Submission and completion throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use priopool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn post_wait_throughput(c: &mut Criterion) {
    let pool = ThreadPool::new(&Config::default()).unwrap();

    let mut group = c.benchmark_group("post_wait");

    for size in [100usize, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("post", size), size, |b, &size| {
            b.iter(|| {
                let counter = Arc::new(AtomicUsize::new(0));
                for _ in 0..size {
                    let counter = counter.clone();
                    pool.post(move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                    })
                    .unwrap();
                }
                pool.wait_for_all();
                black_box(counter.load(Ordering::Relaxed))
            });
        });
    }

    group.finish();
}

fn batch_vs_single_post(c: &mut Criterion) {
    let pool = ThreadPool::new(&Config::default()).unwrap();

    let mut group = c.benchmark_group("batch_vs_single");

    group.bench_function("single_1000", |b| {
        b.iter(|| {
            for i in 0..1_000i64 {
                pool.post(move || {
                    black_box(i * 2);
                })
                .unwrap();
            }
            pool.wait_for_all();
        });
    });

    group.bench_function("batch_1000", |b| {
        b.iter(|| {
            let closures: Vec<_> = (0..1_000i64)
                .map(|i| {
                    move || {
                        black_box(i * 2);
                    }
                })
                .collect();
            pool.post_batch(closures, Priority::Normal).unwrap();
            pool.wait_for_all();
        });
    });

    group.finish();
}

fn submit_roundtrip(c: &mut Criterion) {
    let pool = ThreadPool::new(&Config::default()).unwrap();

    c.bench_function("submit_get_100", |b| {
        b.iter(|| {
            let futures: Vec<_> = (0..100i64)
                .map(|i| pool.submit(move || black_box(i * i)).unwrap())
                .collect();
            let sum: i64 = futures.into_iter().map(|f| f.get().unwrap()).sum();
            black_box(sum)
        });
    });
}

criterion_group!(
    benches,
    post_wait_throughput,
    batch_vs_single_post,
    submit_roundtrip
);
criterion_main!(benches);
