//! Benchmarks for the analysis pipeline.
//!
//! Measures each stage on generated graphs:
//! - Cycle breaking on a long cycle and on nested loops
//! - Dominator tree construction on a ladder of diamonds
//! - The full pipeline including bubble extraction

extern crate domibubble;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use domibubble::{
    break_cycles, build_dominator_tree, find_bubbles, make_graph,
    pipeline::{Pipeline, PipelineConfig},
    IndexedGraph,
};
use std::hint::black_box;

/// `n` diamonds chained one after the other, each closing with a merge node.
fn diamond_ladder(n: usize) -> IndexedGraph<usize> {
    let mut edges = Vec::with_capacity(n * 4);
    for i in 0..n {
        let top = i * 3;
        edges.push((top, top + 1));
        edges.push((top, top + 2));
        edges.push((top + 1, top + 3));
        edges.push((top + 2, top + 3));
    }
    make_graph(0..=n * 3, edges).unwrap()
}

/// A diamond ladder where every third diamond loops back to its top.
fn looping_ladder(n: usize) -> IndexedGraph<usize> {
    let mut edges = Vec::with_capacity(n * 5);
    for i in 0..n {
        let top = i * 3;
        edges.push((top, top + 1));
        edges.push((top, top + 2));
        edges.push((top + 1, top + 3));
        edges.push((top + 2, top + 3));
        if i % 3 == 0 {
            edges.push((top + 3, top));
        }
    }
    make_graph(0..=n * 3, edges).unwrap()
}

fn single_cycle(n: usize) -> IndexedGraph<usize> {
    let mut edges: Vec<(usize, usize)> = (0..n - 1).map(|i| (i, i + 1)).collect();
    edges.push((n - 1, 0));
    make_graph(0..n, edges).unwrap()
}

fn bench_break_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("break_cycles");
    for size in [1_000, 10_000] {
        let cycle = single_cycle(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("single_cycle", size), &cycle, |b, graph| {
            b.iter(|| black_box(break_cycles(black_box(graph)).unwrap()));
        });

        let ladder = looping_ladder(size / 3);
        group.bench_with_input(BenchmarkId::new("looping_ladder", size), &ladder, |b, graph| {
            b.iter(|| black_box(break_cycles(black_box(graph)).unwrap()));
        });
    }
    group.finish();
}

fn bench_dominator_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("dominator_tree");
    for size in [1_000, 10_000] {
        let acyclic = break_cycles(&diamond_ladder(size)).unwrap();
        group.throughput(Throughput::Elements(acyclic.node_count() as u64));
        group.bench_with_input(BenchmarkId::new("diamond_ladder", size), &acyclic, |b, graph| {
            b.iter(|| black_box(build_dominator_tree(black_box(graph), None).unwrap()));
        });
    }
    group.finish();
}

fn bench_find_bubbles(c: &mut Criterion) {
    let acyclic = break_cycles(&diamond_ladder(10_000)).unwrap();
    let tree = build_dominator_tree(&acyclic, None).unwrap();

    c.bench_function("find_bubbles_diamond_ladder", |b| {
        b.iter(|| black_box(find_bubbles(black_box(&acyclic), black_box(&tree))));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let graph = looping_ladder(3_000);

    c.bench_function("pipeline_looping_ladder", |b| {
        b.iter(|| {
            let report = Pipeline::new(PipelineConfig::default())
                .run(black_box(&graph))
                .unwrap();
            black_box(report)
        });
    });
}

criterion_group!(
    benches,
    bench_break_cycles,
    bench_dominator_tree,
    bench_find_bubbles,
    bench_pipeline
);
criterion_main!(benches);
