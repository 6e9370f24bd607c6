// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subdivide, rendered as text.
//!
//! Drive an orchestrator for a few simulated seconds and print the leaf layout as a character
//! grid every so often: each cell shows the depth of the leaf covering it, lower case while
//! that leaf is still animating.
//!
//! Run:
//! - `cargo run -p understory_examples --example subdivide_ascii`

use kurbo::{Point, Rect};
use understory_partition::DivideRule;
use understory_split_tree::AnimState;
use understory_subdivide::{LeafView, Orchestrator, SubdivideConfig};

const COLS: usize = 64;
const ROWS: usize = 24;
const GLYPHS: &[u8] = b"0123456789";
const BUSY: &[u8] = b"0abcdefghi";

fn render(leaves: &[LeafView], bounds: Rect) -> String {
    let mut grid = vec![b' '; COLS * ROWS];
    for leaf in leaves {
        let depth = (leaf.depth as usize).min(GLYPHS.len() - 1);
        let glyph = if leaf.state == AnimState::Idle {
            GLYPHS[depth]
        } else {
            BUSY[depth]
        };
        for row in 0..ROWS {
            for col in 0..COLS {
                let pt = Point::new(
                    bounds.x0 + (col as f64 + 0.5) * bounds.width() / COLS as f64,
                    bounds.y0 + (row as f64 + 0.5) * bounds.height() / ROWS as f64,
                );
                if leaf.bounds.contains(pt) {
                    grid[row * COLS + col] = glyph;
                }
            }
        }
    }
    grid.chunks(COLS)
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() {
    env_logger::init();

    let bounds = Rect::new(0.0, 0.0, 640.0, 480.0);
    let config = SubdivideConfig {
        max_depth: 5,
        min_depth: 1,
        min_life_span: 600.0,
        divide_rule: DivideRule::QuartersRandom,
        noise_frequency: 0.006,
        noise_speed: 0.0004,
        enter_duration: 300.0,
        exit_duration: 250.0,
        stagger: 40.0,
        seed: 2025,
        ..Default::default()
    };
    let mut orch = Orchestrator::new(bounds, config);
    orch.initialize(Point::new(160.0, 120.0), 2);
    log::info!("seeded {} leaves", orch.leaves().len());

    let mut frame = Vec::new();
    for step in 0..=600_u32 {
        let time = f64::from(step) * 16.0;
        frame.clear();
        orch.tick(time, |leaf| frame.push(*leaf));
        if step % 150 == 0 {
            let busy = frame.iter().filter(|l| l.state != AnimState::Idle).count();
            println!(
                "t = {time:>6.0} ms: {} leaves, {busy} animating\n{}\n",
                frame.len(),
                render(&frame, bounds)
            );
        }
    }
}
