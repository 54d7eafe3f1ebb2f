//! Performance benchmarks for fractal-tree-lib
//!
//! Run with: cargo bench --package fractal-tree-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fractal_tree_lib::{
    DEFAULT_EPSILONS, FractalTree, TreeParams, estimate_dimension, estimate_dimension_multi,
};

/// Build the classic tree at the given depth
fn classic_tree(depth: u32) -> FractalTree {
    TreeParams {
        depth,
        ..TreeParams::default()
    }
    .build()
    .unwrap()
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for depth in [8u32, 12, 16] {
        let segments = (1u64 << depth) - 1;
        group.throughput(Throughput::Elements(segments));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| classic_tree(depth));
        });
    }

    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    let tree = classic_tree(14);
    group.throughput(Throughput::Elements(tree.segment_count() as u64));
    group.bench_function("pre_order_14", |b| {
        b.iter(|| tree.segments().filter(|(_, s)| s.is_leaf()).count());
    });

    group.finish();
}

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    group.sample_size(20);

    let tree = classic_tree(12);
    group.bench_function("single_epsilon_12", |b| {
        b.iter(|| estimate_dimension(&tree, 1e-3).unwrap());
    });

    group.bench_function("default_epsilons_12", |b| {
        b.iter(|| estimate_dimension_multi(&tree, DEFAULT_EPSILONS).unwrap());
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_construction, bench_traversal, bench_estimate);

criterion_main!(benches);
