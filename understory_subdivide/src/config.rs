// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orchestrator configuration.

use understory_partition::DivideRule;
use understory_split_tree::{AnimationConfig, Easing};

/// Tunables for an [`Orchestrator`](crate::Orchestrator).
///
/// Build with struct-update syntax and let construction validate it:
///
/// ```
/// use understory_subdivide::SubdivideConfig;
///
/// let config = SubdivideConfig { max_depth: 6, threshold_change: 0.4, ..Default::default() };
/// config.validate();
/// ```
///
/// Times are in the same unit as the timestamps passed to
/// [`Orchestrator::tick`](crate::Orchestrator::tick), normally milliseconds.
#[derive(Copy, Clone, Debug)]
pub struct SubdivideConfig {
    /// Leaves at this depth never divide.
    pub max_depth: u32,
    /// Leaves at this depth never ask their parent to collapse. Must be below `max_depth`.
    pub min_depth: u32,
    /// Noise magnitude in `(0, 1)` beyond which a leaf acts.
    pub threshold_change: f64,
    /// Minimum age before a leaf is considered for a split or merge.
    pub min_life_span: f64,
    /// Rule applied to every division.
    pub divide_rule: DivideRule,
    /// Spatial frequency: noise is sampled at `centre * noise_frequency`.
    pub noise_frequency: f64,
    /// Temporal frequency: noise is sampled at `time * noise_speed`.
    pub noise_speed: f64,
    /// Grow-in duration.
    pub enter_duration: f64,
    /// Shrink-out duration.
    pub exit_duration: f64,
    /// Grow-in curve.
    pub enter_easing: Easing,
    /// Shrink-out curve.
    pub exit_easing: Easing,
    /// Per-sibling leading delay for freshly divided children.
    pub stagger: f64,
    /// Seed for partitioning, seeding, and the default noise field.
    pub seed: u64,
}

impl Default for SubdivideConfig {
    fn default() -> Self {
        let anim = AnimationConfig::default();
        Self {
            max_depth: 5,
            min_depth: 1,
            threshold_change: 0.3,
            min_life_span: 1500.0,
            divide_rule: DivideRule::QuartersGrid,
            noise_frequency: 0.004,
            noise_speed: 0.0002,
            enter_duration: anim.enter_duration,
            exit_duration: anim.exit_duration,
            enter_easing: anim.enter_easing,
            exit_easing: anim.exit_easing,
            stagger: anim.stagger,
            seed: 0x5EED,
        }
    }
}

impl SubdivideConfig {
    /// Panics if any setting is out of range.
    ///
    /// These are programmer errors: they cannot be corrected while the engine runs.
    #[track_caller]
    pub fn validate(&self) {
        assert!(
            self.min_depth < self.max_depth,
            "min_depth ({}) must be below max_depth ({})",
            self.min_depth,
            self.max_depth
        );
        assert!(
            self.threshold_change > 0.0 && self.threshold_change < 1.0,
            "threshold_change must be in (0, 1), got {}",
            self.threshold_change
        );
        assert!(
            self.min_life_span.is_finite() && self.min_life_span >= 0.0,
            "min_life_span must be finite and non-negative, got {}",
            self.min_life_span
        );
        assert!(
            self.noise_frequency.is_finite() && self.noise_speed.is_finite(),
            "noise frequency and speed must be finite"
        );
        self.animation().validate();
    }

    /// The animation subset of this configuration.
    pub fn animation(&self) -> AnimationConfig {
        AnimationConfig {
            enter_duration: self.enter_duration,
            exit_duration: self.exit_duration,
            enter_easing: self.enter_easing,
            exit_easing: self.exit_easing,
            stagger: self.stagger,
        }
    }
}
