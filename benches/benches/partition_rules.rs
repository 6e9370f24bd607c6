// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use understory_partition::{DivideRule, partition};

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");
    let rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    let focus = Point::new(300.0, 200.0);
    group.throughput(Throughput::Elements(1));
    for rule in DivideRule::ALL {
        let mut rng = SmallRng::seed_from_u64(0xCAFE_F00D);
        group.bench_function(format!("{rule:?}"), |b| {
            b.iter(|| black_box(partition(black_box(rect), rule, focus, &mut rng)));
        });
    }
    group.finish();
}

fn bench_recursive(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_recursive");
    for &depth in &[4_u32, 6] {
        let mut rng = SmallRng::seed_from_u64(0xBADC_F00D);
        group.bench_function(format!("quarters_random_depth{depth}"), |b| {
            b.iter(|| {
                let mut level = vec![Rect::new(0.0, 0.0, 1024.0, 1024.0)];
                for _ in 0..depth {
                    level = level
                        .iter()
                        .flat_map(|r| {
                            partition(*r, DivideRule::QuartersRandom, r.center(), &mut rng)
                        })
                        .collect();
                }
                black_box(level.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_partition, bench_recursive);
criterion_main!(benches);
