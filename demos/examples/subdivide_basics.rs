// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subdivide basics.
//!
//! Seed an orchestrator, run it with a custom noise field and the ideal-depth policy, and
//! print how the leaf count and depth histogram evolve.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_examples --example subdivide_basics`

use kurbo::{Point, Rect};
use understory_subdivide::{IdealDepthPolicy, Orchestrator, SubdivideConfig};

fn main() {
    env_logger::init();

    let config = SubdivideConfig {
        max_depth: 4,
        min_depth: 0,
        min_life_span: 250.0,
        noise_frequency: 0.01,
        noise_speed: 0.001,
        enter_duration: 200.0,
        exit_duration: 200.0,
        ..Default::default()
    };
    // A slow wave moving left to right: deep on the crest, shallow in the trough.
    let wave = |x: f64, _y: f64, t: f64| (x - t).sin();
    let mut orch = Orchestrator::with_parts(
        Rect::new(0.0, 0.0, 600.0, 300.0),
        config,
        wave,
        IdealDepthPolicy::default(),
    );
    orch.initialize(Point::new(300.0, 150.0), 1);

    for step in 0..=40_u32 {
        let time = f64::from(step) * 100.0;
        let mut histogram = [0_usize; 5];
        let mut shown = 0.0;
        orch.tick(time, |leaf| {
            histogram[leaf.depth as usize] += 1;
            shown += leaf.bounds.area() * leaf.progress;
        });
        if step % 5 == 0 {
            println!(
                "t = {time:>5.0}: {:>3} leaves, depths {histogram:?}, visible area {:>5.1}%",
                orch.leaves().len(),
                100.0 * shown / (600.0 * 300.0),
            );
        }
    }
}
