// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core spatial tree: structure, division, collapse, and traversal.

use alloc::vec;
use alloc::vec::Vec;
use kurbo::{Point, Rect};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use understory_partition::{DivideRule, assert_valid, contains, partition};

use crate::types::NodeId;

/// Recursive subdivision of a root rectangle.
///
/// Nodes live in an arena of generational slots. A node owns its children through
/// its `children` list; the `parent` link is a plain [`NodeId`] used only for upward
/// lookup, so the structure has no ownership cycles.
///
/// Every node carries a payload `T` created when the node is.
pub struct SpatialTree<T> {
    nodes: Vec<Option<Node<T>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    focus: Point,
    rng: SmallRng,
}

impl<T> core::fmt::Debug for SpatialTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("SpatialTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("root", &self.root)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node<T> {
    generation: u32,
    bounds: Rect,
    depth: u32,
    rule: DivideRule,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: T,
}

impl<T> SpatialTree<T> {
    /// Create a tree whose root covers `bounds`, seeded from `seed`.
    ///
    /// The focus point starts at the centre of `bounds`.
    ///
    /// # Panics
    ///
    /// If `bounds` does not have finite coordinates and a positive width and height.
    #[track_caller]
    pub fn new(bounds: Rect, rule: DivideRule, data: T, seed: u64) -> Self {
        assert_valid(bounds);
        let root = Node {
            generation: 1,
            bounds,
            depth: 0,
            rule,
            parent: None,
            children: Vec::new(),
            data,
        };
        Self {
            nodes: vec![Some(root)],
            generations: vec![1],
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            focus: bounds.center(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The root node. It lives as long as the tree.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// A tree always has its root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Reference point used by [`DivideRule::TwoThirds`].
    pub fn focus(&self) -> Point {
        self.focus
    }

    /// Move the reference point used by [`DivideRule::TwoThirds`].
    pub fn set_focus(&mut self, focus: Point) {
        self.focus = focus;
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Bounds of a live node.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.bounds)
    }

    /// Depth of a live node; the root is at depth 0.
    pub fn depth(&self, id: NodeId) -> Option<u32> {
        self.node_opt(id).map(|n| n.depth)
    }

    /// Parent of a live node (`None` for the root or a stale id).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live node, in partition order. Empty for leaves and stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `id` is a live node with no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.children.is_empty())
    }

    /// Division rule of a live node.
    pub fn rule(&self, id: NodeId) -> Option<DivideRule> {
        self.node_opt(id).map(|n| n.rule)
    }

    /// Change the division rule of a live node. Its future children inherit it.
    pub fn set_rule(&mut self, id: NodeId, rule: DivideRule) -> bool {
        match self.node_opt_mut(id) {
            Some(n) => {
                n.rule = rule;
                true
            }
            None => false,
        }
    }

    /// Payload of a live node.
    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.node_opt(id).map(|n| &n.data)
    }

    /// Mutable payload of a live node.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_opt_mut(id).map(|n| &mut n.data)
    }

    /// Divide a leaf, creating one child per piece of its partition.
    ///
    /// `make` builds the payload of each child from its index among its siblings,
    /// its bounds, and its depth.
    /// Returns false (and changes nothing) if `id` is stale or already has children.
    pub fn divide_with(
        &mut self,
        id: NodeId,
        mut make: impl FnMut(usize, Rect, u32) -> T,
    ) -> bool {
        let (bounds, rule, depth) = match self.node_opt(id) {
            Some(n) if n.children.is_empty() => (n.bounds, n.rule, n.depth + 1),
            _ => return false,
        };
        let pieces = partition(bounds, rule, self.focus, &mut self.rng);
        debug_assert_eq!(pieces.len(), rule.child_count(), "partition size mismatch");
        let children: Vec<NodeId> = pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| {
                let data = make(i, piece, depth);
                self.alloc(Node {
                    generation: 0,
                    bounds: piece,
                    depth,
                    rule,
                    parent: Some(id),
                    children: Vec::new(),
                    data,
                })
            })
            .collect();
        log::debug!("divided {id:?} at depth {} into {} children", depth - 1, children.len());
        self.node_mut(id).children = children;
        true
    }

    /// Discard every descendant of `id`, making it a leaf again.
    ///
    /// Payloads of discarded nodes are dropped, not merged into `id`.
    /// Returns false (and changes nothing) if `id` is stale or has no children.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        let children = match self.node_opt_mut(id) {
            Some(n) if !n.children.is_empty() => core::mem::take(&mut n.children),
            _ => return false,
        };
        let mut released = 0_usize;
        let mut stack = children;
        while let Some(child) = stack.pop() {
            if let Some(node) = self.nodes[child.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(child.idx());
                released += 1;
            }
        }
        log::debug!("collapsed {id:?}, released {released} nodes");
        true
    }

    /// The leaf containing `pt`, or `None` if `pt` lies outside the root.
    ///
    /// Containment is closed, so points on shared edges resolve to the first
    /// child in partition order.
    pub fn find_node(&self, pt: Point) -> Option<NodeId> {
        let mut id = self.root;
        if !contains(self.node(id).bounds, pt) {
            return None;
        }
        loop {
            let node = self.node(id);
            if node.children.is_empty() {
                return Some(id);
            }
            id = *node
                .children
                .iter()
                .find(|c| contains(self.node(**c).bounds, pt))?;
        }
    }

    /// All leaves, in pre-order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.leaves_under(self.root)
    }

    /// All nodes, in pre-order (root first).
    pub fn all(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        out.push(self.root);
        out.extend(self.descendants(self.root));
        out
    }

    /// Leaves of the subtree rooted at `id` (just `id` if it is a leaf), in pre-order.
    pub fn leaves_under(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id).filter(|n| self.is_leaf(*n)).collect()
    }

    /// Strict descendants of `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id).skip(1).collect()
    }

    // --- internals ---

    /// Pre-order walk starting at (and including) `id`.
    fn walk(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = if self.is_alive(id) { vec![id] } else { Vec::new() };
        core::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.node(next).children.iter().rev().copied());
            Some(next)
        })
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId stores 32-bit slot indices."
    )]
    fn alloc(&mut self, mut node: Node<T>) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            NodeId::new(idx as u32, generation)
        } else {
            node.generation = 1;
            self.nodes.push(Some(node));
            self.generations.push(1);
            NodeId::new((self.nodes.len() - 1) as u32, 1)
        }
    }

    /// Access a live node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node<T> {
        self.node_opt(id).expect("dangling NodeId")
    }

    /// Access a live node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node<T>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }
}

impl<T: Default> SpatialTree<T> {
    /// Divide a leaf, giving each child a default payload.
    ///
    /// See [`SpatialTree::divide_with`].
    pub fn divide(&mut self, id: NodeId) -> bool {
        self.divide_with(id, |_, _, _| T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_partition::rect::overlap_area;

    fn square() -> SpatialTree<()> {
        SpatialTree::new(Rect::new(0.0, 0.0, 100.0, 100.0), DivideRule::QuartersGrid, (), 1)
    }

    fn assert_tiles_root<T>(tree: &SpatialTree<T>) {
        let root = tree.bounds(tree.root()).unwrap();
        let leaves = tree.leaves();
        let area: f64 = leaves.iter().map(|l| tree.bounds(*l).unwrap().area()).sum();
        assert!((area - root.area()).abs() < 1e-6, "leaf area {area} != {}", root.area());
        for (i, a) in leaves.iter().enumerate() {
            assert!(tree.children(*a).is_empty());
            for b in &leaves[i + 1..] {
                let (ra, rb) = (tree.bounds(*a).unwrap(), tree.bounds(*b).unwrap());
                assert!(overlap_area(ra, rb) < 1e-9, "{ra:?} overlaps {rb:?}");
            }
        }
    }

    #[test]
    fn quarters_grid_divide_of_square() {
        let mut tree = square();
        let root = tree.root();
        assert!(tree.divide(root));
        let bounds: Vec<Rect> = tree
            .children(root)
            .iter()
            .map(|c| tree.bounds(*c).unwrap())
            .collect();
        assert_eq!(
            bounds,
            vec![
                Rect::from_origin_size((0.0, 0.0), (50.0, 50.0)),
                Rect::from_origin_size((50.0, 0.0), (50.0, 50.0)),
                Rect::from_origin_size((0.0, 50.0), (50.0, 50.0)),
                Rect::from_origin_size((50.0, 50.0), (50.0, 50.0)),
            ]
        );
        for c in tree.children(root) {
            assert_eq!(tree.depth(*c), Some(1));
            assert_eq!(tree.parent(*c), Some(root));
        }
    }

    #[test]
    fn divide_fails_on_internal_node() {
        let mut tree = square();
        let root = tree.root();
        assert!(tree.divide(root));
        assert!(!tree.divide(root));
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn collapse_fails_on_leaf() {
        let mut tree = square();
        assert!(!tree.collapse(tree.root()));
    }

    #[test]
    fn divide_then_collapse_restores_leaf() {
        let mut tree = square();
        let root = tree.root();
        assert!(tree.divide(root));
        let kids = tree.children(root).to_vec();
        assert!(tree.divide(kids[0]));
        assert!(tree.collapse(root));
        assert!(tree.is_leaf(root));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.leaves(), vec![root]);
        for k in kids {
            assert!(!tree.is_alive(k), "collapsed children must be stale");
        }
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut tree = square();
        let root = tree.root();
        tree.divide(root);
        let old = tree.children(root)[0];
        tree.collapse(root);
        tree.divide(root);
        let reused = tree.children(root).iter().copied().find(|c| c.0 == old.0).unwrap();
        assert!(reused.1 > old.1);
        assert!(!tree.is_alive(old));
        assert_eq!(tree.bounds(old), None);
        assert!(!tree.divide(old));
    }

    #[test]
    fn leaves_tile_root_under_every_rule() {
        for rule in DivideRule::ALL {
            let mut tree: SpatialTree<()> =
                SpatialTree::new(Rect::new(-40.0, 10.0, 260.0, 130.0), rule, (), 99);
            for _ in 0..4 {
                for leaf in tree.leaves() {
                    tree.divide(leaf);
                }
            }
            assert_tiles_root(&tree);
            let first = tree.children(tree.root())[0];
            tree.collapse(first);
            assert_tiles_root(&tree);
        }
    }

    #[test]
    fn find_node_descends_to_leaf() {
        let mut tree = square();
        let root = tree.root();
        tree.divide(root);
        let br = tree.children(root)[3];
        tree.divide(br);
        let hit = tree.find_node(Point::new(90.0, 90.0)).unwrap();
        assert!(tree.is_leaf(hit));
        assert_eq!(tree.parent(hit), Some(br));
        assert!(contains(tree.bounds(hit).unwrap(), Point::new(90.0, 90.0)));
        assert_eq!(tree.find_node(Point::new(100.0, 100.0)), Some(tree.children(br)[3]));
        assert_eq!(tree.find_node(Point::new(100.5, 50.0)), None);
        assert_eq!(tree.find_node(Point::new(-1.0, 50.0)), None);
    }

    #[test]
    fn traversals_are_pre_order() {
        let mut tree = square();
        let root = tree.root();
        tree.divide(root);
        let kids = tree.children(root).to_vec();
        tree.divide(kids[1]);
        let grandkids = tree.children(kids[1]).to_vec();

        let all = tree.all();
        assert_eq!(all.len(), 9);
        assert_eq!(all[0], root);
        assert_eq!(all[1], kids[0]);
        assert_eq!(all[2], kids[1]);
        assert_eq!(&all[3..7], grandkids.as_slice());
        assert_eq!(all[7], kids[2]);

        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 7);
        assert_eq!(leaves[0], kids[0]);
        assert_eq!(&leaves[1..5], grandkids.as_slice());
        assert_eq!(tree.leaves_under(kids[1]), grandkids);
        assert_eq!(tree.descendants(kids[1]), grandkids);
    }

    #[test]
    fn same_seed_partitions_identically() {
        let build = |seed| {
            let bounds = Rect::new(0.0, 0.0, 240.0, 160.0);
            let mut tree: SpatialTree<()> =
                SpatialTree::new(bounds, DivideRule::QuartersRandom, (), seed);
            for _ in 0..3 {
                for leaf in tree.leaves() {
                    tree.divide(leaf);
                }
            }
            tree.leaves()
                .into_iter()
                .map(|l| tree.bounds(l).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(build(21), build(21));
        assert_ne!(build(21), build(22));
    }

    #[test]
    fn divide_with_builds_payloads() {
        let mut tree: SpatialTree<(usize, u32)> =
            SpatialTree::new(Rect::new(0.0, 0.0, 90.0, 30.0), DivideRule::ThirdsRow, (0, 0), 3);
        let root = tree.root();
        assert!(tree.divide_with(root, |i, _, depth| (i, depth)));
        let payloads: Vec<_> = tree
            .children(root)
            .iter()
            .map(|c| *tree.data(*c).unwrap())
            .collect();
        assert_eq!(payloads, vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn children_inherit_rule() {
        let mut tree = square();
        let root = tree.root();
        assert!(tree.set_rule(root, DivideRule::Half));
        tree.divide(root);
        assert_eq!(tree.children(root).len(), 2);
        assert_eq!(tree.rule(tree.children(root)[0]), Some(DivideRule::Half));
    }

    #[test]
    #[should_panic(expected = "positive width and height")]
    fn zero_sized_root_panics() {
        let _ = SpatialTree::new(Rect::new(0.0, 0.0, 0.0, 10.0), DivideRule::Half, (), 0);
    }
}
