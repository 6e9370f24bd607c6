// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_subdivide --heading-base-level=0

//! Understory Subdivide: a noise-driven, animated recursive subdivision of a rectangle.
//!
//! Every tick, each idle leaf of an [`AnimatedTree`](understory_split_tree::AnimatedTree) that
//! has lived long enough samples a [`NoiseField`] at its centre. A [`SplitPolicy`] turns the
//! sample into a [`Decision`]: divide the leaf, collapse its parent, or hold. The
//! [`Orchestrator`] applies the decision within the configured depth range and hands every
//! leaf to a drawing callback as a [`LeafView`].
//!
//! - [`SubdivideConfig`]: depth range, threshold, life span, divide rule, noise and animation tunables.
//! - [`GradientNoise`]: seeded 3D gradient noise with time as the third axis.
//! - [`ThresholdPolicy`] and [`IdealDepthPolicy`]: the two built-in policies; closures work too.
//!
//! Rendering is left to the caller: the orchestrator never draws, it only reports.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_subdivide::{Orchestrator, SubdivideConfig};
//!
//! let mut orch = Orchestrator::new(Rect::new(0.0, 0.0, 800.0, 600.0), SubdivideConfig::default());
//! orch.initialize(Point::new(400.0, 300.0), 2);
//!
//! let mut drawn = 0;
//! for frame in 0..120 {
//!     drawn = 0;
//!     orch.tick(f64::from(frame) * 16.0, |leaf| {
//!         assert!((0.0..=1.0).contains(&leaf.progress));
//!         drawn += 1;
//!     });
//! }
//! assert_eq!(drawn, orch.leaves().len());
//! ```

pub mod config;
pub mod noise;
pub mod orchestrator;
pub mod policy;

pub use config::SubdivideConfig;
pub use noise::{GradientNoise, NoiseField};
pub use orchestrator::{LeafView, Orchestrator};
pub use policy::{Decision, IdealDepthPolicy, Polarity, PolicyInput, SplitPolicy, ThresholdPolicy};
