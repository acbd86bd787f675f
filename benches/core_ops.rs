// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Core tree operation benchmarks.
//!
//! Measures performance of:
//! - `insert` - single-element insertion, amortized over growth
//! - `find` / `lower_bound` - point and range lookup
//! - `erase_one` - single-element removal
//! - `bulk_load` - building a tree directly from sorted input
//! - forward iteration over the full leaf chain

use bptree::BTreeMap;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn shuffled_keys(n: usize) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..n as u64).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    keys.shuffle(&mut rng);
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &n| {
            b.iter_batched(
                || shuffled_keys(n),
                |keys| {
                    let mut map = BTreeMap::new();
                    for k in keys {
                        black_box(map.insert(k, k.wrapping_mul(31)));
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = shuffled_keys(*size);
        let mut map = BTreeMap::new();
        for &k in &keys {
            map.insert(k, k);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for k in keys.iter().step_by(7) {
                    black_box(map.get(k));
                }
            });
        });
    }

    group.finish();
}

fn bench_erase_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase_one");
    group.sample_size(20);

    for size in [1_000, 10_000, 50_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &n| {
            b.iter_batched(
                || {
                    let keys = shuffled_keys(n);
                    let mut map = BTreeMap::new();
                    for &k in &keys {
                        map.insert(k, k);
                    }
                    (map, keys)
                },
                |(mut map, keys)| {
                    for k in &keys {
                        black_box(map.remove(k));
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_load");

    for size in [1_000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &n| {
            b.iter_batched(
                || (0..n as u64).map(|k| (k, k)).collect::<Vec<_>>(),
                |items| {
                    let mut map = BTreeMap::new();
                    black_box(map.bulk_load(items).unwrap());
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_iteration");

    for size in [1_000, 10_000, 100_000].iter() {
        let mut map = BTreeMap::new();
        map.bulk_load((0..*size as u64).map(|k| (k, k)).collect()).unwrap();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for pair in map.iter() {
                    black_box(pair);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_find, bench_erase_one, bench_bulk_load, bench_iteration);
criterion_main!(benches);
