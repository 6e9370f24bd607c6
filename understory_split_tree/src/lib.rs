// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_split_tree --heading-base-level=0

//! Understory Split Tree: a recursive spatial subdivision whose structural changes are animated.
//!
//! - [`SpatialTree`]: an arena of nodes, each covering a rectangle; a node is either a leaf or
//!   divided into the pieces of its [`DivideRule`](understory_partition::DivideRule).
//! - [`Timer`]: normalized, eased progress driven by external ticks, with a one-shot completion.
//! - [`AnimatedTree`]: wraps a [`SpatialTree`] so that dividing and collapsing run exit and
//!   enter animations, and a node is only ever discarded after every leaf below it has
//!   finished exiting.
//!
//! ## Ownership
//!
//! Children are owned by their parent's child list. The parent link is a [`NodeId`] used for
//! upward lookup only. Ids are generational: once a collapse discards a node, its id stays
//! stale forever, even when the slot is reused.
//!
//! ## Scheduling
//!
//! Everything advances inside [`AnimatedTree::tick`]. There are no threads and no callbacks;
//! the collapse join is a per-node counter of leaves still exiting, decremented as each
//! leaf's timer completes.
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_partition::DivideRule;
//! use understory_split_tree::{AnimState, AnimatedTree, AnimationConfig, Easing};
//!
//! let config = AnimationConfig {
//!     enter_duration: 1000.0,
//!     exit_duration: 1000.0,
//!     enter_easing: Easing::Linear,
//!     exit_easing: Easing::Linear,
//!     stagger: 0.0,
//! };
//! let mut tree = AnimatedTree::new(
//!     Rect::new(0.0, 0.0, 100.0, 100.0),
//!     DivideRule::QuartersGrid,
//!     config,
//!     1,
//! );
//! let root = tree.root();
//!
//! // Grow in.
//! tree.tick(500.0);
//! assert_eq!(tree.progress(root), Some(0.5));
//! tree.tick(500.0);
//! assert_eq!(tree.state(root), Some(AnimState::Idle));
//!
//! // Shrink out, then divide.
//! assert!(tree.request_divide(root));
//! let report = tree.tick(1000.0);
//! assert_eq!(report.divided, vec![root]);
//! assert_eq!(tree.spatial().leaves().len(), 4);
//! ```

#![no_std]

extern crate alloc;

pub mod animated;
pub mod easing;
pub mod timer;
pub mod tree;
pub mod types;

pub use animated::{AnimatedTree, Animation, AnimationConfig, TickReport};
pub use easing::Easing;
pub use timer::{Direction, Timer};
pub use tree::SpatialTree;
pub use types::{AnimState, NodeId};
