// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Noise fields driving split and merge decisions.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// A deterministic, continuous function of position and time with values in `[-1, 1]`.
///
/// Closures of the right shape are noise fields too:
///
/// ```
/// use understory_subdivide::NoiseField;
///
/// let stripes = |x: f64, _y: f64, t: f64| (x + t).sin();
/// assert_eq!(stripes.sample(0.0, 5.0, 0.0), 0.0);
/// ```
pub trait NoiseField {
    /// Sample the field at `(x, y)` and time `t`.
    fn sample(&self, x: f64, y: f64, t: f64) -> f64;
}

impl<F: Fn(f64, f64, f64) -> f64> NoiseField for F {
    fn sample(&self, x: f64, y: f64, t: f64) -> f64 {
        self(x, y, t)
    }
}

/// Three-dimensional gradient noise over a seeded permutation table.
///
/// Time is the third axis, so a fixed point drifts smoothly as time advances.
/// The field is zero on every integer lattice point.
#[derive(Clone)]
pub struct GradientNoise {
    perm: [u8; 512],
    seed: u64,
}

impl core::fmt::Debug for GradientNoise {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GradientNoise")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl GradientNoise {
    /// Build the permutation table for `seed`.
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut SmallRng::seed_from_u64(seed));
        let mut perm = [0_u8; 512];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = table[i & 255];
        }
        Self { perm, seed }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn p(&self, i: usize) -> usize {
        usize::from(self.perm[i])
    }
}

impl NoiseField for GradientNoise {
    fn sample(&self, x: f64, y: f64, t: f64) -> f64 {
        let (xi, x) = lattice(x);
        let (yi, y) = lattice(y);
        let (zi, z) = lattice(t);
        let (u, v, w) = (fade(x), fade(y), fade(z));

        let a = self.p(xi) + yi;
        let aa = self.p(a) + zi;
        let ab = self.p(a + 1) + zi;
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b) + zi;
        let bb = self.p(b + 1) + zi;

        let near = lerp(
            v,
            lerp(u, grad(self.p(aa), x, y, z), grad(self.p(ba), x - 1.0, y, z)),
            lerp(u, grad(self.p(ab), x, y - 1.0, z), grad(self.p(bb), x - 1.0, y - 1.0, z)),
        );
        let far = lerp(
            v,
            lerp(
                u,
                grad(self.p(aa + 1), x, y, z - 1.0),
                grad(self.p(ba + 1), x - 1.0, y, z - 1.0),
            ),
            lerp(
                u,
                grad(self.p(ab + 1), x, y - 1.0, z - 1.0),
                grad(self.p(bb + 1), x - 1.0, y - 1.0, z - 1.0),
            ),
        );
        lerp(w, near, far).clamp(-1.0, 1.0)
    }
}

/// Split a coordinate into its wrapped lattice cell and the offset within it.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Lattice cells wrap at 256; only the low byte matters."
)]
fn lattice(v: f64) -> (usize, f64) {
    let floor = v.floor();
    ((floor as i64 & 255) as usize, v - floor)
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
