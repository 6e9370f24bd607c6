// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the split tree: node identifiers and animation states.

/// Identifier for a node in a [`SpatialTree`](crate::SpatialTree).
///
/// This is a small, copyable handle that stays stable while its node lives and
/// becomes invalid when the node is discarded by a collapse.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - When a collapse discards a node, its slot is freed; any existing `NodeId` for it is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`SpatialTree::is_alive`](crate::SpatialTree::is_alive) to check liveness.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Animation state of a node in an [`AnimatedTree`](crate::AnimatedTree).
///
/// Transitions:
///
/// ```text
///            ┌──────────── timer done ───────────┐
///            ▼                                   │
/// Entering ──► Idle ──request_divide──► WillDivide (timer done: divide, back to Idle)
///            ▲   │
///            │   └──request_collapse──► WillCollapse (leaves: ParentWillCollapse)
///            └──── all leaf exits done: collapse ─┘
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimState {
    /// Growing in after creation (or after the node's children collapsed into it).
    #[default]
    Entering,
    /// Running its own exit animation before dividing.
    WillDivide,
    /// Waiting for every leaf below it to finish exiting before collapsing.
    WillCollapse,
    /// Leaf exit animation because an ancestor is collapsing.
    ParentWillCollapse,
    /// At rest.
    Idle,
}

impl AnimState {
    /// Visible progress for this state given the timer's eased progress.
    ///
    /// `Idle` is always fully shown, `Entering` follows the timer, and every
    /// exit state runs the timer backwards.
    pub fn progress(self, timer_progress: f64) -> f64 {
        match self {
            Self::Idle => 1.0,
            Self::Entering => timer_progress,
            Self::WillDivide | Self::WillCollapse | Self::ParentWillCollapse => {
                1.0 - timer_progress
            }
        }
    }

    /// Whether the node is mid-animation (anything but `Idle`).
    pub fn is_busy(self) -> bool {
        self != Self::Idle
    }
}
