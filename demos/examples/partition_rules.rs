// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition rules.
//!
//! Divide one rectangle with every rule and print the pieces.
//!
//! Run:
//! - `cargo run -p understory_examples --example partition_rules`

use kurbo::{Point, Rect};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use understory_partition::{DivideRule, partition};

fn main() {
    let rect = Rect::new(0.0, 0.0, 300.0, 200.0);
    // Off-centre focus so TwoThirds shows which side gets the small piece.
    let focus = Point::new(40.0, 150.0);
    let mut rng = SmallRng::seed_from_u64(7);

    println!("dividing {rect:?} (focus {focus:?})");
    for rule in DivideRule::ALL {
        let pieces = partition(rect, rule, focus, &mut rng);
        println!("\n{rule:?}: {} pieces", pieces.len());
        for r in &pieces {
            println!(
                "  ({:>6.1}, {:>6.1}) .. ({:>6.1}, {:>6.1})  {:>6.1} x {:>6.1}",
                r.x0,
                r.y0,
                r.x1,
                r.y1,
                r.width(),
                r.height()
            );
        }
        let covered: f64 = pieces.iter().map(|r| r.area()).sum();
        println!("  covered area: {covered:.1} of {:.1}", rect.area());
    }
}
