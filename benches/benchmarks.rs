// benches/benchmarks.rs — Performance benchmarks (criterion)
//
// Per-epoch bookkeeping that runs without the network:
//   1. Leaf frontier collection on wide and deep forests
//   2. Full node counts for the epoch report
//   3. Checkpoint serialization of the whole forest

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use evoforest::dataset::write_forest;
use evoforest::forest::{Forest, Node};

// ─── Helpers ────────────────────────────────────────────────────────────────

/// `roots` trees, each a complete `fanout`-ary tree of the given depth.
fn wide_forest(roots: usize, fanout: usize, depth: usize) -> Forest {
    let mut forest = Forest::new();
    for r in 0..roots {
        let root = forest.push_root(Node::new(
            "You are a helpful assistant.",
            format!("Seed prompt #{r}: explain a topic, with examples"),
            "",
            false,
        ));
        let mut level = vec![root];
        for d in 0..depth {
            let mut next = Vec::with_capacity(level.len() * fanout);
            for &parent in &level {
                for k in 0..fanout {
                    let text = format!("{} / depth {d} variant {k}", forest.node(parent).user_prompt);
                    next.push(forest.append_child(parent, Node::derived(forest.node(parent), text)));
                }
            }
            level = next;
        }
    }
    forest
}

/// A single lineage `len` nodes long.
fn chain(len: usize) -> Forest {
    let mut forest = Forest::new();
    let mut tip = forest.push_root(Node::new("sys", "step 0", "", false));
    for i in 1..len {
        tip = forest.append_child(tip, Node::derived(forest.node(tip), format!("step {i}")));
    }
    forest
}

// ─── Benchmark: Leaf frontier ───────────────────────────────────────────────

fn bench_leaves(c: &mut Criterion) {
    let wide = wide_forest(100, 4, 3);
    let deep = chain(20_000);
    let mut group = c.benchmark_group("leaves");

    group.bench_function("leaves_wide_8500_nodes", |b| {
        b.iter(|| black_box(wide.leaves()))
    });

    group.bench_function("leaves_chain_20000", |b| b.iter(|| black_box(deep.leaves())));

    group.finish();
}

// ─── Benchmark: Node counts ─────────────────────────────────────────────────

fn bench_count(c: &mut Criterion) {
    let wide = wide_forest(100, 4, 3);
    let mut group = c.benchmark_group("count");

    group.bench_function("count_nodes_wide", |b| b.iter(|| black_box(wide.count_nodes())));
    group.bench_function("stats_wide", |b| b.iter(|| black_box(wide.stats())));

    group.finish();
}

// ─── Benchmark: Checkpoint serialization ────────────────────────────────────

fn bench_checkpoint(c: &mut Criterion) {
    let small = wide_forest(10, 4, 2);
    let large = wide_forest(100, 4, 3);
    let mut group = c.benchmark_group("checkpoint");

    group.bench_function("write_forest_210_rows", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            write_forest(black_box(&small), &mut buf).expect("write");
            buf
        })
    });

    group.bench_function("write_forest_8500_rows", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(1 << 20);
            write_forest(black_box(&large), &mut buf).expect("write");
            buf
        })
    });

    group.finish();
}

criterion_group!(benches, bench_leaves, bench_count, bench_checkpoint);
criterion_main!(benches);
