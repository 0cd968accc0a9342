//! Benchmark for Llrb vs standard BTreeMap.
//!
//! Compares the arena-backed tree against Rust's standard BTreeMap for
//! insert, search and delete.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use redblack::Llrb;
use std::collections::BTreeMap;
use std::hint::black_box;

/// Scatters `0..size` so inserts do not arrive in ascending order.
fn scattered(size: i32) -> impl Iterator<Item = i32> {
    (0..size).map(move |index| (index * 7919) % size)
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("Llrb", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut tree = Llrb::new();
                for key in scattered(size) {
                    tree.insert(black_box(key), black_box(key * 2));
                }
                black_box(tree)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for key in scattered(size) {
                        map.insert(black_box(key), black_box(key * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// search Benchmark
// =============================================================================

fn benchmark_search(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("search");

    for size in [100, 1000, 10000] {
        let tree: Llrb<i32, i32> = scattered(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = scattered(size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("Llrb", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for key in 0..size {
                    if let Some(&value) = tree.search(&black_box(key)) {
                        sum += value;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = standard_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// delete Benchmark
// =============================================================================

fn benchmark_delete(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("delete");

    for size in [100, 1000, 10000] {
        let tree: Llrb<i32, i32> = scattered(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = scattered(size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("Llrb", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for key in 0..size {
                        tree.delete(&black_box(key));
                    }
                    black_box(tree)
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || standard_map.clone(),
                    |mut map| {
                        for key in 0..size {
                            map.remove(&black_box(key));
                        }
                        black_box(map)
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// =============================================================================
// delete_min Benchmark
// =============================================================================

fn benchmark_delete_min(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("delete_min");

    for size in [100, 1000, 10000] {
        let tree: Llrb<i32, i32> = scattered(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = scattered(size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("Llrb", size), &size, |bencher, _| {
            bencher.iter_batched(
                || tree.clone(),
                |mut tree| {
                    while let Some(entry) = tree.delete_min() {
                        black_box(entry);
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter_batched(
                || standard_map.clone(),
                |mut map| {
                    while let Some(entry) = map.pop_first() {
                        black_box(entry);
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_search,
    benchmark_delete,
    benchmark_delete_min
);

criterion_main!(benches);
