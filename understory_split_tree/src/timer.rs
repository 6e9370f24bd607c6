// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A normalized, eased progress timer driven by external ticks.
//!
//! A [`Timer`] owns one linear progress value in `[0, 1]`. Each [`Timer::tick`] moves it by
//! `delta / duration` in the current [`Direction`]. When it reaches the end of a run the tick
//! returns `true`; that is the completion notification, and it is delivered once per run.
//!
//! ```
//! use understory_split_tree::{Easing, Timer};
//!
//! let mut timer = Timer::new(1000.0, Easing::Linear);
//! assert!(!timer.tick(500.0));
//! assert_eq!(timer.progress(), 0.5);
//! assert!(timer.tick(500.0), "completes on this tick");
//! assert!(!timer.tick(500.0), "and never again until restarted");
//! ```

use crate::easing::Easing;

/// Decimal places kept by [`Timer::progress`].
const PROGRESS_SCALE: f64 = 1e6;

/// Slack applied when deciding that a run reached its bound.
const COMPLETION_EPSILON: f64 = 1e-9;

/// Direction of a timer run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Progress increases towards 1.
    #[default]
    Forward,
    /// Progress decreases towards 0.
    Reverse,
}

/// Normalized progress timer.
#[derive(Clone, Debug)]
pub struct Timer {
    linear: f64,
    duration: f64,
    direction: Direction,
    easing: Easing,
    delay: f64,
    complete: bool,
}

impl Timer {
    /// Create a timer at progress 0, running forward.
    ///
    /// # Panics
    ///
    /// If `duration` is not finite and strictly positive.
    #[track_caller]
    pub fn new(duration: f64, easing: Easing) -> Self {
        assert_duration(duration);
        Self {
            linear: 0.0,
            duration,
            direction: Direction::Forward,
            easing,
            delay: 0.0,
            complete: false,
        }
    }

    /// Advance by `delta` (same unit as the duration).
    ///
    /// A pending delay is consumed first; the tick that consumes it does not move progress.
    /// Returns `true` on the tick that completes the current run, `false` otherwise,
    /// including every tick after completion until [`restart`](Self::restart) or
    /// [`reverse`](Self::reverse).
    pub fn tick(&mut self, delta: f64) -> bool {
        if self.complete {
            return false;
        }
        let delta = delta.max(0.0);
        if self.delay > 0.0 {
            self.delay = (self.delay - delta).max(0.0);
            return false;
        }
        let step = delta / self.duration;
        match self.direction {
            Direction::Forward => {
                self.linear = (self.linear + step).min(1.0);
                if self.linear >= 1.0 - COMPLETION_EPSILON {
                    self.linear = 1.0;
                    self.complete = true;
                }
            }
            Direction::Reverse => {
                self.linear = (self.linear - step).max(0.0);
                if self.linear <= COMPLETION_EPSILON {
                    self.linear = 0.0;
                    self.complete = true;
                }
            }
        }
        self.complete
    }

    /// Reset to progress 0, running forward, with the completion flag cleared.
    pub fn restart(&mut self) {
        self.linear = 0.0;
        self.direction = Direction::Forward;
        self.complete = false;
    }

    /// Run backwards from the current progress, or from `from` when given.
    pub fn reverse(&mut self, from: Option<f64>) {
        if let Some(from) = from {
            self.linear = from.clamp(0.0, 1.0);
        }
        self.direction = Direction::Reverse;
        self.complete = false;
    }

    /// Install a leading wait consumed before progress advances.
    pub fn set_delay(&mut self, delay: f64) {
        self.delay = delay.max(0.0);
    }

    /// Change the duration of subsequent ticks.
    ///
    /// # Panics
    ///
    /// If `duration` is not finite and strictly positive.
    #[track_caller]
    pub fn set_duration(&mut self, duration: f64) {
        assert_duration(duration);
        self.duration = duration;
    }

    /// Change the easing curve.
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Eased progress, rounded to six decimal places.
    pub fn progress(&self) -> f64 {
        round_scaled(self.easing.apply(self.linear))
    }

    /// Raw linear progress in `[0, 1]`.
    pub fn linear_progress(&self) -> f64 {
        self.linear
    }

    /// Whether the current run has completed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Current run direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Remaining leading delay.
    pub fn pending_delay(&self) -> f64 {
        self.delay
    }

    /// Duration of a full run.
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// Round to `1 / PROGRESS_SCALE`, half away from zero.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Scaled progress is bounded far inside the i64 range."
)]
fn round_scaled(v: f64) -> f64 {
    let scaled = v * PROGRESS_SCALE;
    let whole = if scaled < 0.0 {
        (scaled - 0.5) as i64
    } else {
        (scaled + 0.5) as i64
    };
    whole as f64 / PROGRESS_SCALE
}

#[track_caller]
fn assert_duration(duration: f64) {
    assert!(
        duration.is_finite() && duration > 0.0,
        "timer duration must be finite and positive, got {duration}"
    );
}
