// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves mapping linear progress in `[0, 1]` to eased progress.

/// An easing curve.
///
/// Every built-in curve maps `0 → 0` and `1 → 1`. [`Easing::Custom`] should do the same.
#[derive(Copy, Clone, Debug, Default)]
pub enum Easing {
    /// No acceleration.
    Linear,
    /// Cubic: slow start, accelerates.
    EaseIn,
    /// Cubic: fast start, decelerates.
    EaseOut,
    /// Cubic: slow start and end.
    #[default]
    EaseInOut,
    /// Quadratic: slow start and end, softer than [`Easing::EaseInOut`].
    QuadInOut,
    /// A caller supplied curve.
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Apply the curve to `t`, which is clamped to `[0, 1]` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let t1 = t - 1.0;
                t1 * t1 * t1 + 1.0
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let t1 = 2.0 * t - 2.0;
                    0.5 * t1 * t1 * t1 + 1.0
                }
            }
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let t1 = 2.0 - 2.0 * t;
                    1.0 - t1 * t1 / 2.0
                }
            }
            Self::Custom(f) => f(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILT_IN: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::QuadInOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for e in BUILT_IN {
            assert!(e.apply(0.0).abs() < 1e-12, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{e:?} at 1");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for e in BUILT_IN {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = e.apply(f64::from(i) / 100.0);
                assert!(v + 1e-12 >= prev, "{e:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn symmetric_curves_pass_through_half() {
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn input_is_clamped_and_custom_is_called() {
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Custom(|t| t * t).apply(0.5), 0.25);
    }
}
