// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated tree: divide and collapse as eased transitions.
//!
//! ## Lifecycle
//!
//! - Every new node starts [`Entering`](AnimState::Entering) and settles into [`Idle`](AnimState::Idle).
//! - [`AnimatedTree::request_divide`] runs the leaf's exit animation
//!   ([`WillDivide`](AnimState::WillDivide)); when it completes the leaf divides and its
//!   children start entering.
//! - [`AnimatedTree::request_collapse`] marks an internal node
//!   [`WillCollapse`](AnimState::WillCollapse) and every leaf below it
//!   [`ParentWillCollapse`](AnimState::ParentWillCollapse). The node keeps a count of leaves
//!   still exiting; each finished exit decrements it, and at zero the node collapses and
//!   grows back in as a leaf.
//!
//! Requests never partially apply: either every precondition holds and the whole
//! transition is queued, or nothing changes and the request returns `false`.

use alloc::vec::Vec;
use kurbo::{Point, Rect};
use understory_partition::DivideRule;

use crate::easing::Easing;
use crate::timer::Timer;
use crate::tree::SpatialTree;
use crate::types::{AnimState, NodeId};

/// Durations (in clock units, typically milliseconds) and curves for node animations.
#[derive(Copy, Clone, Debug)]
pub struct AnimationConfig {
    /// Length of a grow-in animation.
    pub enter_duration: f64,
    /// Length of a shrink-out animation.
    pub exit_duration: f64,
    /// Curve applied to grow-in animations.
    pub enter_easing: Easing,
    /// Curve applied to shrink-out animations.
    pub exit_easing: Easing,
    /// Extra leading delay per sibling index for freshly divided children.
    pub stagger: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enter_duration: 800.0,
            exit_duration: 600.0,
            enter_easing: Easing::EaseOut,
            exit_easing: Easing::EaseIn,
            stagger: 0.0,
        }
    }
}

impl AnimationConfig {
    /// Panics if a duration is not finite and positive or the stagger is negative.
    #[track_caller]
    pub fn validate(&self) {
        assert!(
            self.enter_duration.is_finite() && self.enter_duration > 0.0,
            "enter_duration must be finite and positive, got {}",
            self.enter_duration
        );
        assert!(
            self.exit_duration.is_finite() && self.exit_duration > 0.0,
            "exit_duration must be finite and positive, got {}",
            self.exit_duration
        );
        assert!(
            self.stagger.is_finite() && self.stagger >= 0.0,
            "stagger must be finite and non-negative, got {}",
            self.stagger
        );
    }
}

/// Per-node animation payload.
#[derive(Clone, Debug)]
pub struct Animation {
    state: AnimState,
    birth_time: f64,
    timer: Timer,
    /// Leaves still exiting while this node is `WillCollapse`.
    pending_exits: usize,
    /// The collapsing ancestor to notify when this leaf's exit completes.
    collapse_owner: Option<NodeId>,
    retired: bool,
}

impl Animation {
    fn entering(config: &AnimationConfig, birth_time: f64, delay: f64) -> Self {
        let mut timer = Timer::new(config.enter_duration, config.enter_easing);
        timer.set_delay(delay);
        Self {
            state: AnimState::Entering,
            birth_time,
            timer,
            pending_exits: 0,
            collapse_owner: None,
            retired: false,
        }
    }

    fn start(&mut self, state: AnimState, duration: f64, easing: Easing) {
        self.state = state;
        self.timer.set_duration(duration);
        self.timer.set_easing(easing);
        self.timer.set_delay(0.0);
        self.timer.restart();
    }

    /// Current state.
    pub fn state(&self) -> AnimState {
        self.state
    }

    /// Visible progress in `[0, 1]`, derived from the state and the timer.
    pub fn progress(&self) -> f64 {
        self.state.progress(self.timer.progress())
    }

    /// Clock time at which the node was created (or last re-entered after a collapse).
    pub fn birth_time(&self) -> f64 {
        self.birth_time
    }

    /// The node's timer.
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Whether this leaf finished its exit and only awaits the ancestor's collapse.
    pub fn is_retired(&self) -> bool {
        self.retired
    }
}

/// Nodes whose structure changed during one [`AnimatedTree::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Leaves that divided.
    pub divided: Vec<NodeId>,
    /// Nodes that collapsed into leaves.
    pub collapsed: Vec<NodeId>,
}

impl TickReport {
    /// Whether the set of leaves changed.
    pub fn is_structural(&self) -> bool {
        !self.divided.is_empty() || !self.collapsed.is_empty()
    }
}

/// A [`SpatialTree`] whose divisions and collapses are animated.
#[derive(Debug)]
pub struct AnimatedTree {
    tree: SpatialTree<Animation>,
    config: AnimationConfig,
    clock: f64,
}

impl AnimatedTree {
    /// Create a tree with an entering root covering `bounds`.
    ///
    /// # Panics
    ///
    /// If `bounds` is not a valid rectangle or `config` fails [`AnimationConfig::validate`].
    #[track_caller]
    pub fn new(bounds: Rect, rule: DivideRule, config: AnimationConfig, seed: u64) -> Self {
        config.validate();
        let root = Animation::entering(&config, 0.0, 0.0);
        Self {
            tree: SpatialTree::new(bounds, rule, root, seed),
            config,
            clock: 0.0,
        }
    }

    /// Read access to the underlying spatial structure.
    pub fn spatial(&self) -> &SpatialTree<Animation> {
        &self.tree
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Current animation settings.
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Replace the animation settings. Runs already in flight keep their duration.
    #[track_caller]
    pub fn set_config(&mut self, config: AnimationConfig) {
        config.validate();
        self.config = config;
    }

    /// Sum of all ticked deltas.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Change the division rule of a node; see [`SpatialTree::set_rule`].
    pub fn set_rule(&mut self, id: NodeId, rule: DivideRule) -> bool {
        self.tree.set_rule(id, rule)
    }

    /// Move the reference point of [`DivideRule::TwoThirds`].
    pub fn set_focus(&mut self, focus: Point) {
        self.tree.set_focus(focus);
    }

    /// Animation payload of a live node.
    pub fn animation(&self, id: NodeId) -> Option<&Animation> {
        self.tree.data(id)
    }

    /// State of a live node.
    pub fn state(&self, id: NodeId) -> Option<AnimState> {
        self.animation(id).map(Animation::state)
    }

    /// Visible progress of a live node.
    pub fn progress(&self, id: NodeId) -> Option<f64> {
        self.animation(id).map(Animation::progress)
    }

    /// Time since the node was born, on this tree's clock.
    pub fn age(&self, id: NodeId) -> Option<f64> {
        self.animation(id).map(|a| self.clock - a.birth_time)
    }

    /// Leaves a collapsing node is still waiting on (0 unless it is `WillCollapse`).
    pub fn pending_exits(&self, id: NodeId) -> Option<usize> {
        self.animation(id).map(|a| a.pending_exits)
    }

    /// Start the exit animation that precedes dividing `id`.
    ///
    /// Fails unless `id` is an idle leaf.
    pub fn request_divide(&mut self, id: NodeId) -> bool {
        if !self.tree.is_leaf(id) {
            return false;
        }
        let AnimationConfig {
            exit_duration,
            exit_easing,
            ..
        } = self.config;
        let Some(anim) = self.tree.data_mut(id) else {
            return false;
        };
        if anim.state != AnimState::Idle {
            return false;
        }
        anim.start(AnimState::WillDivide, exit_duration, exit_easing);
        log::trace!("{id:?} will divide");
        true
    }

    /// Start collapsing the subtree below `id`.
    ///
    /// Fails unless `id` has children and it and every descendant are idle.
    /// On success every leaf below `id` starts its exit animation and `id` waits for all of them.
    pub fn request_collapse(&mut self, id: NodeId) -> bool {
        if self.tree.children(id).is_empty() || self.state(id) != Some(AnimState::Idle) {
            return false;
        }
        let descendants = self.tree.descendants(id);
        if descendants
            .iter()
            .any(|d| self.state(*d) != Some(AnimState::Idle))
        {
            return false;
        }
        let AnimationConfig {
            exit_duration,
            exit_easing,
            ..
        } = self.config;
        let mut leaves = 0_usize;
        for d in descendants {
            if !self.tree.is_leaf(d) {
                continue;
            }
            if let Some(anim) = self.tree.data_mut(d) {
                anim.start(AnimState::ParentWillCollapse, exit_duration, exit_easing);
                anim.collapse_owner = Some(id);
                leaves += 1;
            }
        }
        if let Some(anim) = self.tree.data_mut(id) {
            anim.state = AnimState::WillCollapse;
            anim.pending_exits = leaves;
        }
        log::trace!("{id:?} will collapse, waiting on {leaves} leaves");
        true
    }

    /// Divide a leaf at once, without an exit animation.
    ///
    /// Used to seed a tree before animation starts. The divided node becomes idle and its
    /// children start entering. Fails unless `id` is a leaf that is entering or idle.
    pub fn divide_immediate(&mut self, id: NodeId) -> bool {
        if !matches!(
            self.state(id),
            Some(AnimState::Entering | AnimState::Idle)
        ) {
            return false;
        }
        if !self.divide_animated(id) {
            return false;
        }
        if let Some(anim) = self.tree.data_mut(id) {
            anim.state = AnimState::Idle;
        }
        true
    }

    /// Advance every animating leaf by `delta` and apply the transitions that complete.
    ///
    /// A node's timer always completes before the node acts on it within the same tick.
    /// Nodes created during this tick start animating on the next one.
    pub fn tick(&mut self, delta: f64) -> TickReport {
        let delta = delta.max(0.0);
        self.clock += delta;
        let mut report = TickReport::default();
        for id in self.tree.leaves() {
            // Earlier collapses in this tick may have discarded this leaf.
            let Some(anim) = self.tree.data_mut(id) else {
                continue;
            };
            if anim.retired || anim.state == AnimState::Idle || !anim.timer.tick(delta) {
                continue;
            }
            let state = anim.state;
            match state {
                AnimState::Entering => anim.state = AnimState::Idle,
                AnimState::WillDivide => {
                    anim.state = AnimState::Idle;
                    if self.divide_animated(id) {
                        report.divided.push(id);
                    }
                }
                AnimState::ParentWillCollapse => {
                    anim.retired = true;
                    let owner = anim.collapse_owner;
                    if let Some(owner) = owner
                        && self.finish_exit(owner)
                    {
                        self.complete_collapse(owner);
                        report.collapsed.push(owner);
                    }
                }
                // Internal-only or resting states never run a leaf timer.
                AnimState::WillCollapse | AnimState::Idle => {}
            }
        }
        report
    }

    // --- internals ---

    fn divide_animated(&mut self, id: NodeId) -> bool {
        let config = self.config;
        let clock = self.clock;
        self.tree.divide_with(id, |i, _, _| {
            Animation::entering(&config, clock, config.stagger * i as f64)
        })
    }

    /// Record one finished leaf exit against `owner`. Returns true when it was the last one.
    fn finish_exit(&mut self, owner: NodeId) -> bool {
        let Some(anim) = self.tree.data_mut(owner) else {
            return false;
        };
        debug_assert_eq!(
            anim.state,
            AnimState::WillCollapse,
            "exit reported to a non-collapsing node"
        );
        anim.pending_exits = anim.pending_exits.saturating_sub(1);
        anim.pending_exits == 0
    }

    fn complete_collapse(&mut self, owner: NodeId) {
        self.tree.collapse(owner);
        let AnimationConfig {
            enter_duration,
            enter_easing,
            ..
        } = self.config;
        let clock = self.clock;
        if let Some(anim) = self.tree.data_mut(owner) {
            anim.start(AnimState::Entering, enter_duration, enter_easing);
            anim.birth_time = clock;
        }
    }
}
