// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_partition::DivideRule;
use understory_split_tree::{AnimatedTree, AnimationConfig, SpatialTree};
use understory_subdivide::{GradientNoise, NoiseField, Orchestrator, SubdivideConfig};

const FRAME: f64 = 16.0;

fn bench_orchestrator(c: &mut Criterion) {
    let mut group = c.benchmark_group("orchestrator");
    for &depth in &[2_u32, 4] {
        let config = SubdivideConfig {
            max_depth: 6,
            min_life_span: 200.0,
            ..Default::default()
        };
        group.bench_function(format!("tick_60_frames_seed_depth{depth}"), |b| {
            b.iter_batched(
                || {
                    let mut orch = Orchestrator::new(Rect::new(0.0, 0.0, 1920.0, 1080.0), config);
                    orch.initialize(Point::new(960.0, 540.0), depth);
                    orch
                },
                |mut orch| {
                    let mut drawn = 0_usize;
                    for frame in 0..60 {
                        orch.tick(f64::from(frame) * FRAME, |_| drawn += 1);
                    }
                    black_box(drawn);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_animated_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("animated_tree");
    group.bench_function("tick_256_entering_leaves", |b| {
        b.iter_batched(
            || {
                let mut tree = AnimatedTree::new(
                    Rect::new(0.0, 0.0, 1024.0, 1024.0),
                    DivideRule::QuartersGrid,
                    AnimationConfig::default(),
                    7,
                );
                for _ in 0..4 {
                    for leaf in tree.spatial().leaves() {
                        tree.divide_immediate(leaf);
                    }
                }
                tree
            },
            |mut tree| {
                for _ in 0..60 {
                    black_box(tree.tick(FRAME));
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_find_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_tree");
    let mut tree: SpatialTree<()> =
        SpatialTree::new(Rect::new(0.0, 0.0, 1024.0, 1024.0), DivideRule::QuartersGrid, (), 3);
    for _ in 0..6 {
        for leaf in tree.leaves() {
            tree.divide(leaf);
        }
    }
    group.throughput(Throughput::Elements(1));
    group.bench_function("find_node_depth6", |b| {
        let mut i = 0_u32;
        b.iter(|| {
            i = i.wrapping_add(7919);
            let pt = Point::new(f64::from(i % 1024), f64::from((i / 1024) % 1024));
            black_box(tree.find_node(pt))
        });
    });
    group.finish();
}

fn bench_noise(c: &mut Criterion) {
    let noise = GradientNoise::new(42);
    c.bench_function("gradient_noise_sample", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t += 0.37;
            black_box(noise.sample(t * 0.004, t * 0.003, t * 0.0002))
        });
    });
}

criterion_group!(
    benches,
    bench_orchestrator,
    bench_animated_tree,
    bench_find_node,
    bench_noise,
);
criterion_main!(benches);
