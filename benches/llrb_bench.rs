//! Benchmark for LlrbTree vs standard BTreeSet.
//!
//! Compares exclusive and copy-on-write trees against Rust's standard
//! BTreeSet, and measures the cost of writing to a fresh snapshot.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use llrb::tree::LlrbTree;
use std::collections::BTreeSet;

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        for copy_on_write in [false, true] {
            let name = if copy_on_write { "LlrbTree (cow)" } else { "LlrbTree" };
            group.bench_with_input(BenchmarkId::new(name, size), &size, |bencher, &size| {
                bencher.iter(|| {
                    let mut tree = LlrbTree::with_copy_on_write(copy_on_write);
                    for index in (0..size).rev() {
                        tree.replace_or_insert(black_box(index));
                    }
                    black_box(tree)
                });
            });
        }

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut set = BTreeSet::new();
                for index in (0..size).rev() {
                    set.insert(black_box(index));
                }
                black_box(set)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1000, 10000] {
        let tree: LlrbTree<i32> = (0..size).collect();
        let set: BTreeSet<i32> = (0..size).collect();

        group.bench_with_input(BenchmarkId::new("LlrbTree", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for index in 0..size {
                    black_box(tree.get(black_box(&index)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for index in 0..size {
                    black_box(set.get(black_box(&index)));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// delete Benchmark
// =============================================================================

fn benchmark_delete(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("delete");

    for size in [100, 1000, 10000] {
        let tree: LlrbTree<i32> = (0..size).collect();

        group.bench_with_input(BenchmarkId::new("delete", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for index in 0..size {
                        black_box(tree.delete(black_box(&index)));
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("delete_min", size), &size, |bencher, _| {
            bencher.iter_batched(
                || tree.clone(),
                |mut tree| {
                    while let Some(item) = tree.delete_min() {
                        black_box(item);
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Snapshot Benchmark
// =============================================================================

fn benchmark_snapshot_write(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("snapshot_write");

    for size in [1000, 10000, 100_000] {
        let mut cow: LlrbTree<i32> = LlrbTree::new_cow();
        cow.replace_or_insert_bulk(0..size);
        let exclusive: LlrbTree<i32> = (0..size).collect();

        group.bench_with_input(BenchmarkId::new("cow", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut snapshot = cow.clone();
                snapshot.replace_or_insert(black_box(size / 2));
                black_box(snapshot)
            });
        });

        group.bench_with_input(BenchmarkId::new("deep_copy", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut copy = exclusive.clone();
                copy.replace_or_insert(black_box(size / 2));
                black_box(copy)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_delete,
    benchmark_snapshot_write
);
criterion_main!(benches);
