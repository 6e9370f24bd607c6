// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_partition --heading-base-level=0

//! Understory Partition: Kurbo-native rules for dividing a rectangle into sub-rectangles.
//!
//! Understory Partition is the geometric leaf of the subdivision stack.
//!
//! - Divides a [`kurbo::Rect`] into 2–4 non-overlapping pieces that exactly tile it.
//! - Exposes the rule set as a closed enumeration, [`DivideRule`], dispatched through an exhaustive match.
//! - Provides the rectangle helpers the higher layers need: closed containment, uniform and biased random points.
//!
//! Higher layers (like [`understory_split_tree`](https://docs.rs/understory_split_tree)) own the
//! hierarchy and call [`partition`] whenever a region divides.
//!
//! ## Rules
//!
//! | Rule | Pieces | Shape |
//! |---|---|---|
//! | [`DivideRule::Half`] | 2 | equal halves across the longer axis |
//! | [`DivideRule::TwoThirds`] | 2 | 1/3 + 2/3, larger piece towards the focus point |
//! | [`DivideRule::ThirdsRow`] | 3 | equal thirds across the longer axis |
//! | [`DivideRule::QuartersGrid`] | 4 | equal quarters |
//! | [`DivideRule::QuartersRandom`] | 4 | quarters through a random interior point |
//! | [`DivideRule::TwoRandom`] | 2 | random split within 25%–75% of the longer axis |
//!
//! When a rectangle is near square (width/height within 0.75–1.33) the axis of a one-axis rule is
//! chosen at random, so repeated division does not drift towards stripes in one direction.
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use understory_partition::{DivideRule, partition};
//!
//! let mut rng = SmallRng::seed_from_u64(1);
//! let parts = partition(
//!     Rect::new(0.0, 0.0, 100.0, 100.0),
//!     DivideRule::QuartersGrid,
//!     Point::ORIGIN,
//!     &mut rng,
//! );
//! assert_eq!(parts.len(), 4);
//! assert_eq!(parts[3], Rect::new(50.0, 50.0, 100.0, 100.0));
//! ```

#![no_std]

extern crate alloc;

pub mod rect;
pub mod rule;

pub use rect::{Axis, assert_valid, biased_point, contains, is_valid, random_point};
pub use rule::{DivideRule, partition};
