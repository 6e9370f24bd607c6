// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Division rules and the [`partition`] dispatcher.

use alloc::vec;
use alloc::vec::Vec;
use kurbo::{Point, Rect};
use rand::Rng;

use crate::rect::{
    Axis, INTERIOR_BAND, choose_axis, interior_point, split_at, split_even, split_through,
};

/// How a rectangle is divided into its children.
///
/// Each rule produces a fixed number of pieces, see [`DivideRule::child_count`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DivideRule {
    /// Two equal halves across the longer axis.
    Half,
    /// A 1/3 + 2/3 pair across the longer axis.
    ///
    /// The larger piece lands on the side nearer the focus point.
    TwoThirds,
    /// Three equal pieces across the longer axis.
    ThirdsRow,
    /// Four equal quarters, split through the centre on both axes.
    #[default]
    QuartersGrid,
    /// Four unequal quarters, split on both axes through a random point of the central 25%–75% box.
    #[doc(alias = "FourRandom")]
    QuartersRandom,
    /// Two unequal pieces across the longer axis, split at a random point within 25%–75%.
    TwoRandom,
}

impl DivideRule {
    /// All rules, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Half,
        Self::TwoThirds,
        Self::ThirdsRow,
        Self::QuartersGrid,
        Self::QuartersRandom,
        Self::TwoRandom,
    ];

    /// Number of children a division with this rule produces.
    pub const fn child_count(self) -> usize {
        match self {
            Self::Half | Self::TwoThirds | Self::TwoRandom => 2,
            Self::ThirdsRow => 3,
            Self::QuartersGrid | Self::QuartersRandom => 4,
        }
    }
}

/// Partition `rect` into [`rule.child_count()`](DivideRule::child_count) sub-rectangles that
/// exactly tile it.
///
/// `focus` is the reference point for [`DivideRule::TwoThirds`]; other rules ignore it.
/// Pieces are ordered left to right, then top to bottom.
///
/// This is total for any rectangle with positive width and height.
pub fn partition(rect: Rect, rule: DivideRule, focus: Point, rng: &mut impl Rng) -> Vec<Rect> {
    match rule {
        DivideRule::Half => {
            let (a, b) = split_at(rect, choose_axis(rect, rng), 0.5);
            vec![a, b]
        }
        DivideRule::TwoThirds => {
            let axis = choose_axis(rect, rng);
            let centre = rect.center();
            let focus_first = match axis {
                Axis::X => focus.x < centre.x,
                Axis::Y => focus.y < centre.y,
            };
            let fraction = if focus_first { 2.0 / 3.0 } else { 1.0 / 3.0 };
            let (a, b) = split_at(rect, axis, fraction);
            vec![a, b]
        }
        DivideRule::ThirdsRow => split_even(rect, choose_axis(rect, rng), 3),
        DivideRule::QuartersGrid => split_through(rect, rect.center()).to_vec(),
        DivideRule::QuartersRandom => split_through(rect, interior_point(rect, rng)).to_vec(),
        DivideRule::TwoRandom => {
            let axis = choose_axis(rect, rng);
            let (a, b) = split_at(rect, axis, rng.random_range(INTERIOR_BAND));
            vec![a, b]
        }
    }
}
