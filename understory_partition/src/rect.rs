// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle helpers: validity, closed containment, random points, and axis splits.

use alloc::vec::Vec;
use kurbo::{Point, Rect};
use rand::Rng;

/// Lower bound (inclusive) of the width/height ratio treated as "near square".
pub const NEAR_SQUARE_MIN: f64 = 0.75;
/// Upper bound (inclusive) of the width/height ratio treated as "near square".
pub const NEAR_SQUARE_MAX: f64 = 1.33;

/// Fraction range used for biased interior points and random split positions.
pub const INTERIOR_BAND: core::ops::RangeInclusive<f64> = 0.25..=0.75;

/// The axis along which a rectangle is divided.
///
/// `X` cuts with vertical lines (pieces sit side by side), `Y` cuts with
/// horizontal lines (pieces are stacked).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Divide the horizontal extent.
    X,
    /// Divide the vertical extent.
    Y,
}

/// Returns true if `rect` has finite coordinates and a strictly positive width and height.
pub fn is_valid(rect: Rect) -> bool {
    rect.x0.is_finite()
        && rect.y0.is_finite()
        && rect.x1.is_finite()
        && rect.y1.is_finite()
        && rect.width() > 0.0
        && rect.height() > 0.0
}

/// Panics unless `rect` [is valid](is_valid).
///
/// Non-positive dimensions are programmer errors and cannot be recovered from at runtime.
#[track_caller]
pub fn assert_valid(rect: Rect) {
    assert!(
        is_valid(rect),
        "rectangle must have finite coordinates and positive width and height, got {rect:?}"
    );
}

/// Closed containment: points on any edge are inside.
///
/// Unlike [`Rect::contains`], the right and bottom edges are included, so every
/// point of a tiled region resolves to some tile.
pub fn contains(rect: Rect, pt: Point) -> bool {
    pt.x >= rect.x0 && pt.x <= rect.x1 && pt.y >= rect.y0 && pt.y <= rect.y1
}

/// Area shared by two rectangles (zero when they only touch or are disjoint).
pub fn overlap_area(a: Rect, b: Rect) -> f64 {
    a.intersect(b).area()
}

/// A point drawn uniformly inside `rect`.
pub fn random_point(rect: Rect, rng: &mut impl Rng) -> Point {
    Point::new(
        rect.x0 + rect.width() * rng.random::<f64>(),
        rect.y0 + rect.height() * rng.random::<f64>(),
    )
}

/// A point drawn uniformly from the central 25%–75% box of `rect`.
pub fn interior_point(rect: Rect, rng: &mut impl Rng) -> Point {
    Point::new(
        rect.x0 + rect.width() * rng.random_range(INTERIOR_BAND),
        rect.y0 + rect.height() * rng.random_range(INTERIOR_BAND),
    )
}

/// A point concentrated around `bias` and clamped into `rect`.
///
/// Offsets follow a triangular distribution spanning the full rectangle, so
/// points near `bias` are most likely but every region stays reachable.
pub fn biased_point(rect: Rect, bias: Point, rng: &mut impl Rng) -> Point {
    let dx = (rng.random::<f64>() - rng.random::<f64>()) * rect.width();
    let dy = (rng.random::<f64>() - rng.random::<f64>()) * rect.height();
    Point::new(
        (bias.x + dx).clamp(rect.x0, rect.x1),
        (bias.y + dy).clamp(rect.y0, rect.y1),
    )
}

/// Choose the axis to divide: the longer one, or a coin flip when `rect` is near square.
pub fn choose_axis(rect: Rect, rng: &mut impl Rng) -> Axis {
    let ratio = rect.width() / rect.height();
    if (NEAR_SQUARE_MIN..=NEAR_SQUARE_MAX).contains(&ratio) {
        if rng.random_bool(0.5) { Axis::X } else { Axis::Y }
    } else if ratio > 1.0 {
        Axis::X
    } else {
        Axis::Y
    }
}

/// Split `rect` along `axis` at `fraction` of its extent.
///
/// Both halves share the same split coordinate, so they tile `rect` exactly.
pub fn split_at(rect: Rect, axis: Axis, fraction: f64) -> (Rect, Rect) {
    match axis {
        Axis::X => {
            let x = rect.x0 + rect.width() * fraction;
            (
                Rect::new(rect.x0, rect.y0, x, rect.y1),
                Rect::new(x, rect.y0, rect.x1, rect.y1),
            )
        }
        Axis::Y => {
            let y = rect.y0 + rect.height() * fraction;
            (
                Rect::new(rect.x0, rect.y0, rect.x1, y),
                Rect::new(rect.x0, y, rect.x1, rect.y1),
            )
        }
    }
}

/// Split `rect` along `axis` into `n` equal pieces, ordered by increasing coordinate.
pub fn split_even(rect: Rect, axis: Axis, n: usize) -> Vec<Rect> {
    debug_assert!(n > 0, "cannot split into zero pieces");
    let (start, end) = match axis {
        Axis::X => (rect.x0, rect.x1),
        Axis::Y => (rect.y0, rect.y1),
    };
    let step = (end - start) / n as f64;
    let mut out = Vec::with_capacity(n);
    let mut lo = start;
    for i in 1..=n {
        // Pin the last edge so rounding never leaves a gap.
        let hi = if i == n { end } else { start + step * i as f64 };
        out.push(match axis {
            Axis::X => Rect::new(lo, rect.y0, hi, rect.y1),
            Axis::Y => Rect::new(rect.x0, lo, rect.x1, hi),
        });
        lo = hi;
    }
    out
}

/// Split `rect` through `pt` on both axes, yielding four pieces in row-major order
/// (top-left, top-right, bottom-left, bottom-right).
pub fn split_through(rect: Rect, pt: Point) -> [Rect; 4] {
    [
        Rect::new(rect.x0, rect.y0, pt.x, pt.y),
        Rect::new(pt.x, rect.y0, rect.x1, pt.y),
        Rect::new(rect.x0, pt.y, pt.x, rect.y1),
        Rect::new(pt.x, pt.y, rect.x1, rect.y1),
    ]
}
