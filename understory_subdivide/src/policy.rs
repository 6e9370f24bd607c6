// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decision policies: map a leaf's noise sample to divide, collapse, or hold.
//!
//! The orchestrator enforces the depth limits itself (a leaf at `max_depth` never
//! divides, a leaf at `min_depth` never collapses), so a policy only expresses
//! preference.

/// What a policy sees for one idle leaf.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PolicyInput {
    /// Noise sample at the leaf centre, in `[-1, 1]`.
    pub noise: f64,
    /// Depth of the leaf.
    pub depth: u32,
    /// Configured minimum depth.
    pub min_depth: u32,
    /// Configured maximum depth.
    pub max_depth: u32,
    /// Configured `threshold_change`.
    pub threshold: f64,
}

/// What to do with a leaf.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Ask the leaf to divide.
    Divide,
    /// Ask the leaf's parent to collapse.
    Collapse,
    /// Leave it alone.
    Hold,
}

/// A split/merge decision function.
pub trait SplitPolicy {
    /// Decide for one leaf.
    fn decide(&self, input: &PolicyInput) -> Decision;
}

impl<F: Fn(&PolicyInput) -> Decision> SplitPolicy for F {
    fn decide(&self, input: &PolicyInput) -> Decision {
        self(input)
    }
}

/// Which sign of the noise divides.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// `noise > threshold` divides, `noise < -threshold` collapses.
    #[default]
    HighDivides,
    /// `noise < -threshold` divides, `noise > threshold` collapses.
    LowDivides,
}

/// Act when the noise leaves the `[-threshold, threshold]` band.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ThresholdPolicy {
    /// Sign convention.
    pub polarity: Polarity,
}

impl SplitPolicy for ThresholdPolicy {
    fn decide(&self, input: &PolicyInput) -> Decision {
        let n = match self.polarity {
            Polarity::HighDivides => input.noise,
            Polarity::LowDivides => -input.noise,
        };
        if n > input.threshold {
            Decision::Divide
        } else if n < -input.threshold {
            Decision::Collapse
        } else {
            Decision::Hold
        }
    }
}

/// Steer each leaf towards an ideal depth read off the noise.
///
/// The noise maps linearly onto `[min_depth, max_depth]`: `-1` wants the shallowest
/// tree, `1` the deepest. `slack` (in depth units) keeps leaves near their ideal depth
/// from flickering between divide and collapse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IdealDepthPolicy {
    /// Hysteresis in depth units.
    pub slack: f64,
}

impl Default for IdealDepthPolicy {
    fn default() -> Self {
        Self { slack: 0.5 }
    }
}

impl IdealDepthPolicy {
    /// The depth this policy aims for at `input`.
    pub fn ideal_depth(input: &PolicyInput) -> f64 {
        let span = f64::from(input.max_depth.saturating_sub(input.min_depth));
        f64::from(input.min_depth) + (input.noise.clamp(-1.0, 1.0) + 1.0) * 0.5 * span
    }
}

impl SplitPolicy for IdealDepthPolicy {
    fn decide(&self, input: &PolicyInput) -> Decision {
        let ideal = Self::ideal_depth(input);
        let depth = f64::from(input.depth);
        if depth + self.slack < ideal {
            Decision::Divide
        } else if depth - self.slack > ideal {
            Decision::Collapse
        } else {
            Decision::Hold
        }
    }
}
