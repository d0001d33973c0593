//! Benchmark for pathfinding and frontier queries.
//!
//! Run with: cargo bench --package burrow_core --bench pathfinding_benchmark

use burrow_core::{AsciiTerrain, CellCoord, World};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// 128x128 room with a comb of walls, so paths have to weave.
fn comb_world() -> World {
    let size = 128;
    let rows: Vec<String> = (0..size)
        .map(|y| {
            (0..size)
                .map(|x| {
                    let wall = x % 8 == 4 && if (x / 8) % 2 == 0 { y < size - 2 } else { y > 1 };
                    if wall { '#' } else { '.' }
                })
                .collect()
        })
        .collect();
    World::builder()
        .terrain_source(AsciiTerrain::parse(&rows.join("\n")).expect("valid map"))
        .build()
        .expect("world builds")
}

fn benchmark_find_path(c: &mut Criterion) {
    let world = comb_world();
    let start = CellCoord::new(0, 0);
    let goal = CellCoord::new(127, 127);

    c.bench_function("find_path_comb_128", |b| {
        b.iter(|| black_box(world.find_path(black_box(start), black_box(goal), 1 << 16)));
    });
}

fn benchmark_reachable_tree(c: &mut Criterion) {
    let world = comb_world();

    c.bench_function("reachable_from_4096", |b| {
        b.iter(|| black_box(world.reachable_from(CellCoord::new(64, 64), 4096)));
    });
}

fn benchmark_frontier_candidates(c: &mut Criterion) {
    let world = comb_world();

    let mut group = c.benchmark_group("frontier_candidates");
    for radius in [8u32, 24, 96] {
        group.bench_function(format!("radius_{radius}"), |b| {
            b.iter(|| black_box(world.frontier_candidates(CellCoord::new(60, 60), radius, 32)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_find_path,
    benchmark_reachable_tree,
    benchmark_frontier_candidates
);
criterion_main!(benches);
