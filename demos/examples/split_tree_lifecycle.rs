// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split tree lifecycle.
//!
//! Grow a root in, divide it, then collapse it again, printing states and progress as the
//! animations advance.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_examples --example split_tree_lifecycle`

use kurbo::Rect;
use understory_partition::DivideRule;
use understory_split_tree::{AnimatedTree, AnimationConfig, Easing};

fn dump(tree: &AnimatedTree, label: &str) {
    println!("-- {label} (clock {:.0})", tree.clock());
    let spatial = tree.spatial();
    for id in spatial.all() {
        let indent = "  ".repeat(spatial.depth(id).unwrap_or(0) as usize + 1);
        println!(
            "{indent}{id:?} {:?} progress={:.2} pending={}",
            tree.state(id).unwrap_or_default(),
            tree.progress(id).unwrap_or(0.0),
            tree.pending_exits(id).unwrap_or(0),
        );
    }
}

fn main() {
    env_logger::init();

    let config = AnimationConfig {
        enter_duration: 400.0,
        exit_duration: 300.0,
        enter_easing: Easing::EaseOut,
        exit_easing: Easing::EaseIn,
        stagger: 50.0,
    };
    let mut tree = AnimatedTree::new(
        Rect::new(0.0, 0.0, 400.0, 400.0),
        DivideRule::QuartersGrid,
        config,
        11,
    );
    let root = tree.root();

    dump(&tree, "new");
    tree.tick(400.0);
    dump(&tree, "root grown in");

    assert!(tree.request_divide(root), "idle leaf should accept a divide");
    tree.tick(150.0);
    dump(&tree, "root halfway out");
    let report = tree.tick(150.0);
    println!("divided: {:?}", report.divided);
    for _ in 0..8 {
        tree.tick(100.0);
    }
    dump(&tree, "children grown in");

    assert!(tree.request_collapse(root), "idle subtree should accept a collapse");
    dump(&tree, "collapse requested");
    loop {
        let report = tree.tick(100.0);
        if !report.collapsed.is_empty() {
            println!("collapsed: {:?}", report.collapsed);
            break;
        }
    }
    dump(&tree, "root re-entering");
}
