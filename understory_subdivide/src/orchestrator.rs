// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The orchestrator: samples noise per leaf each tick and turns it into animated splits and merges.

use std::collections::HashMap;

use kurbo::{Point, Rect};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use understory_partition::biased_point;
use understory_split_tree::{AnimState, AnimatedTree, NodeId};

use crate::config::SubdivideConfig;
use crate::noise::{GradientNoise, NoiseField};
use crate::policy::{Decision, PolicyInput, SplitPolicy, ThresholdPolicy};

/// Consecutive seeding samples that may miss a shallow leaf before one is divided directly.
const MAX_SEED_MISSES: u32 = 32;

/// Mixed into the configured seed so seeding points do not mirror partition choices.
const SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Everything a drawing collaborator needs to render one leaf.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LeafView {
    /// The leaf.
    pub id: NodeId,
    /// Region covered by the leaf.
    pub bounds: Rect,
    /// Visible progress in `[0, 1]`: 0 is fully hidden, 1 fully shown.
    pub progress: f64,
    /// Depth of the leaf; the root is 0.
    pub depth: u32,
    /// Animation state of the leaf.
    pub state: AnimState,
}

/// Drives an [`AnimatedTree`] from a noise field and a decision policy.
///
/// Call [`tick`](Self::tick) once per frame with a monotonic timestamp. The orchestrator keeps a
/// cached list of leaves, refreshed only when a divide or collapse changes the structure.
pub struct Orchestrator<N = GradientNoise, P = ThresholdPolicy> {
    tree: AnimatedTree,
    config: SubdivideConfig,
    noise: N,
    policy: P,
    leaves: Vec<NodeId>,
    last_time: Option<f64>,
    /// Noise samples of the current tick, keyed by rounded leaf centre.
    samples: HashMap<(i64, i64), f64>,
    rng: SmallRng,
}

impl<N, P> core::fmt::Debug for Orchestrator<N, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .field("leaves", &self.leaves.len())
            .field("last_time", &self.last_time)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create an orchestrator over `bounds` with gradient noise and the threshold policy.
    ///
    /// # Panics
    ///
    /// If `bounds` is not a valid rectangle or `config` fails [`SubdivideConfig::validate`].
    #[track_caller]
    pub fn new(bounds: Rect, config: SubdivideConfig) -> Self {
        let noise = GradientNoise::new(config.seed);
        Self::with_parts(bounds, config, noise, ThresholdPolicy::default())
    }
}

impl<N: NoiseField, P: SplitPolicy> Orchestrator<N, P> {
    /// Create an orchestrator with a custom noise field and policy.
    ///
    /// # Panics
    ///
    /// If `bounds` is not a valid rectangle or `config` fails [`SubdivideConfig::validate`].
    #[track_caller]
    pub fn with_parts(bounds: Rect, config: SubdivideConfig, noise: N, policy: P) -> Self {
        config.validate();
        let tree = AnimatedTree::new(bounds, config.divide_rule, config.animation(), config.seed);
        let leaves = tree.spatial().leaves();
        Self {
            tree,
            config,
            noise,
            policy,
            leaves,
            last_time: None,
            samples: HashMap::new(),
            rng: SmallRng::seed_from_u64(config.seed ^ SEED_SALT),
        }
    }

    /// Seed the tree so every leaf is at least `min_depth` deep.
    ///
    /// Points are drawn around `bias` and the leaf containing each is divided at once, so the
    /// early divisions cluster around `bias`. `bias` also becomes the focus point of
    /// [`DivideRule::TwoThirds`](understory_partition::DivideRule::TwoThirds).
    /// This is setup, not animation: divisions are immediate and the resulting leaves grow in
    /// over the first ticks.
    ///
    /// # Panics
    ///
    /// If `min_depth` exceeds the configured `max_depth`.
    #[track_caller]
    pub fn initialize(&mut self, bias: Point, min_depth: u32) {
        assert!(
            min_depth <= self.config.max_depth,
            "seeding depth ({min_depth}) must not exceed max_depth ({})",
            self.config.max_depth
        );
        self.tree.set_focus(bias);
        let root = self.tree.root();
        let Some(area) = self.tree.spatial().bounds(root) else {
            return;
        };
        let mut misses = 0;
        let mut divisions = 0_usize;
        loop {
            let spatial = self.tree.spatial();
            let shallow = spatial
                .leaves()
                .into_iter()
                .find(|l| spatial.depth(*l).is_some_and(|d| d < min_depth));
            let Some(shallow) = shallow else {
                break;
            };
            let pt = biased_point(area, bias, &mut self.rng);
            let hit = spatial
                .find_node(pt)
                .filter(|h| spatial.depth(*h).is_some_and(|d| d < min_depth));
            let target = match hit {
                Some(hit) if misses < MAX_SEED_MISSES => hit,
                _ if misses < MAX_SEED_MISSES => {
                    misses += 1;
                    continue;
                }
                _ => shallow,
            };
            if self.tree.divide_immediate(target) {
                misses = 0;
                divisions += 1;
            } else if target == shallow {
                log::warn!("seeding stopped: {shallow:?} is busy and cannot divide");
                break;
            } else {
                misses += 1;
            }
        }
        log::debug!("seeded {divisions} divisions around {bias:?} to depth {min_depth}");
        self.refresh_leaves();
    }

    /// Advance to `time` and hand every current leaf to `draw`.
    ///
    /// 1. Timers advance by the time elapsed since the previous call (nothing on the first call).
    /// 2. Every idle leaf older than `min_life_span` samples the noise at its centre and the
    ///    policy decides; divides respect `max_depth`, collapses of the parent respect `min_depth`.
    /// 3. `draw` sees each leaf of the (possibly refreshed) leaf list.
    ///
    /// Requests that cannot be honoured yet (a busy node) are simply dropped; the leaf gets
    /// another chance on a later tick.
    pub fn tick(&mut self, time: f64, mut draw: impl FnMut(&LeafView)) {
        let delta = self.last_time.map_or(0.0, |last| (time - last).max(0.0));
        self.last_time = Some(time);

        let report = self.tree.tick(delta);
        if report.is_structural() {
            self.refresh_leaves();
        }

        self.decide(time);

        for view in self.leaf_views() {
            draw(&view);
        }
    }

    /// The cached leaf list, in pre-order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Views of the cached leaves, without advancing anything.
    pub fn leaf_views(&self) -> impl Iterator<Item = LeafView> + '_ {
        self.leaves.iter().filter_map(move |id| self.view(*id))
    }

    /// The animated tree being driven.
    pub fn tree(&self) -> &AnimatedTree {
        &self.tree
    }

    /// Current configuration.
    pub fn config(&self) -> &SubdivideConfig {
        &self.config
    }

    /// Replace the configuration; it takes effect on the next tick.
    ///
    /// A new `divide_rule` is applied to every live node. `seed` only matters at construction.
    ///
    /// # Panics
    ///
    /// If `config` fails [`SubdivideConfig::validate`].
    #[track_caller]
    pub fn set_config(&mut self, config: SubdivideConfig) {
        config.validate();
        self.tree.set_config(config.animation());
        if config.divide_rule != self.config.divide_rule {
            for id in self.tree.spatial().all() {
                self.tree.set_rule(id, config.divide_rule);
            }
        }
        self.config = config;
    }

    /// The noise field.
    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// The decision policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Replace the decision policy.
    pub fn set_policy(&mut self, policy: P) {
        self.policy = policy;
    }

    // --- internals ---

    fn refresh_leaves(&mut self) {
        self.leaves = self.tree.spatial().leaves();
        log::debug!("leaf cache refreshed: {} leaves", self.leaves.len());
    }

    fn view(&self, id: NodeId) -> Option<LeafView> {
        let spatial = self.tree.spatial();
        let anim = spatial.data(id)?;
        Some(LeafView {
            id,
            bounds: spatial.bounds(id)?,
            progress: anim.progress(),
            depth: spatial.depth(id)?,
            state: anim.state(),
        })
    }

    fn decide(&mut self, time: f64) {
        self.samples.clear();
        let config = self.config;
        for i in 0..self.leaves.len() {
            let id = self.leaves[i];
            let Some(view) = self.view(id) else {
                continue;
            };
            let old_enough = self.tree.age(id).is_some_and(|age| age > config.min_life_span);
            if view.state != AnimState::Idle || !old_enough {
                continue;
            }
            let noise = self.sample_at(view.bounds.center(), time);
            let input = PolicyInput {
                noise,
                depth: view.depth,
                min_depth: config.min_depth,
                max_depth: config.max_depth,
                threshold: config.threshold_change,
            };
            match self.policy.decide(&input) {
                Decision::Divide if view.depth < config.max_depth => {
                    if self.tree.request_divide(id) {
                        log::trace!("noise {noise:.3} divides {id:?} at depth {}", view.depth);
                    }
                }
                Decision::Collapse if view.depth > config.min_depth => {
                    if let Some(parent) = self.tree.spatial().parent(id)
                        && self.tree.request_collapse(parent)
                    {
                        log::trace!("noise {noise:.3} collapses {parent:?} from {id:?}");
                    }
                }
                _ => {}
            }
        }
    }

    /// Noise at `centre`, sampled once per rounded centre per tick.
    ///
    /// Sampling happens at the rounded centre, so the value does not depend on which leaf
    /// sharing that centre asked first.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Centres are rounded to whole units for memoization."
    )]
    fn sample_at(&mut self, centre: Point, time: f64) -> f64 {
        let key = (centre.x.round() as i64, centre.y.round() as i64);
        let SubdivideConfig {
            noise_frequency,
            noise_speed,
            ..
        } = self.config;
        let noise = &self.noise;
        *self.samples.entry(key).or_insert_with(|| {
            noise.sample(
                key.0 as f64 * noise_frequency,
                key.1 as f64 * noise_frequency,
                time * noise_speed,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use understory_partition::DivideRule;
    use understory_split_tree::Easing;

    fn fast_config() -> SubdivideConfig {
        SubdivideConfig {
            max_depth: 3,
            min_depth: 0,
            min_life_span: 0.0,
            enter_duration: 100.0,
            exit_duration: 100.0,
            enter_easing: Easing::Linear,
            exit_easing: Easing::Linear,
            ..Default::default()
        }
    }

    fn square() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn run<N: NoiseField, P: SplitPolicy>(
        orch: &mut Orchestrator<N, P>,
        until: f64,
        mut check: impl FnMut(&Orchestrator<N, P>),
    ) {
        let mut t = 0.0;
        while t <= until {
            orch.tick(t, |_| {});
            check(orch);
            t += 50.0;
        }
    }

    fn assert_tiles(orch: &Orchestrator<impl NoiseField, impl SplitPolicy>, root: Rect) {
        let area: f64 = orch.leaf_views().map(|v| v.bounds.area()).sum();
        assert!((area - root.area()).abs() < 1e-6, "leaves cover {area}, root {}", root.area());
    }

    #[test]
    fn first_tick_draws_entering_root() {
        let mut orch = Orchestrator::new(square(), fast_config());
        let mut drawn = Vec::new();
        orch.tick(1234.0, |v| drawn.push(*v));
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].bounds, square());
        assert_eq!(drawn[0].progress, 0.0);
        assert_eq!(drawn[0].depth, 0);
        assert_eq!(drawn[0].state, AnimState::Entering);
    }

    #[test]
    fn high_noise_divides_down_to_max_depth() {
        let mut orch = Orchestrator::with_parts(
            square(),
            fast_config(),
            |_: f64, _: f64, _: f64| 1.0,
            ThresholdPolicy::default(),
        );
        run(&mut orch, 3000.0, |o| {
            assert_eq!(o.leaves(), o.tree().spatial().leaves().as_slice(), "stale leaf cache");
            assert!(o.leaf_views().all(|v| v.depth <= 3));
            assert_tiles(o, square());
        });
        assert_eq!(orch.leaves().len(), 64);
        assert!(orch.leaf_views().all(|v| v.depth == 3 && v.state == AnimState::Idle));
    }

    #[test]
    fn low_noise_collapses_up_to_min_depth() {
        let config = SubdivideConfig {
            min_depth: 1,
            max_depth: 4,
            ..fast_config()
        };
        let mut orch = Orchestrator::with_parts(
            square(),
            config,
            |_: f64, _: f64, _: f64| -1.0,
            ThresholdPolicy::default(),
        );
        orch.initialize(Point::new(50.0, 50.0), 3);
        assert_eq!(orch.leaves().len(), 64);
        run(&mut orch, 5000.0, |o| {
            assert!(o.leaf_views().all(|v| v.depth >= 1), "collapsed past min_depth");
            assert_tiles(o, square());
        });
        assert_eq!(orch.leaves().len(), 4);
        assert!(orch.leaf_views().all(|v| v.depth == 1));
    }

    #[test]
    fn young_leaves_are_left_alone() {
        let config = SubdivideConfig {
            min_life_span: 1e9,
            ..fast_config()
        };
        let mut orch = Orchestrator::with_parts(
            square(),
            config,
            |_: f64, _: f64, _: f64| 1.0,
            ThresholdPolicy::default(),
        );
        run(&mut orch, 2000.0, |_| {});
        assert_eq!(orch.leaves().len(), 1);
        assert_eq!(orch.tree().state(orch.tree().root()), Some(AnimState::Idle));
    }

    #[test]
    fn noise_is_sampled_once_per_rounded_centre() {
        let calls = Cell::new(0_usize);
        let noise = |_: f64, _: f64, _: f64| {
            calls.set(calls.get() + 1);
            0.0
        };
        let mut orch = Orchestrator::with_parts(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            fast_config(),
            noise,
            ThresholdPolicy::default(),
        );
        orch.initialize(Point::new(0.5, 0.5), 2);
        assert_eq!(orch.leaves().len(), 16);
        orch.tick(0.0, |_| {});
        assert_eq!(calls.get(), 0, "entering leaves are not sampled");
        orch.tick(150.0, |_| {});
        // Centres at 0.125, 0.375, 0.625, 0.875 round to 0 or 1 on each axis.
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn policy_is_pluggable() {
        let mut orch = Orchestrator::with_parts(
            square(),
            fast_config(),
            |_: f64, _: f64, _: f64| 0.0,
            |input: &PolicyInput| {
                if input.depth < 2 { Decision::Divide } else { Decision::Hold }
            },
        );
        run(&mut orch, 2000.0, |_| {});
        assert_eq!(orch.leaves().len(), 16);
    }

    #[test]
    fn initialize_reaches_min_depth_under_every_rule() {
        for rule in DivideRule::ALL {
            let config = SubdivideConfig {
                divide_rule: rule,
                max_depth: 6,
                ..fast_config()
            };
            let bounds = Rect::new(0.0, 0.0, 300.0, 200.0);
            let mut orch = Orchestrator::new(bounds, config);
            orch.initialize(Point::new(20.0, 20.0), 4);
            assert!(orch.leaf_views().all(|v| v.depth >= 4), "{rule:?}");
            assert!(orch.leaf_views().all(|v| v.state == AnimState::Entering));
            assert_eq!(orch.leaves(), orch.tree().spatial().leaves().as_slice());
            assert_tiles(&orch, bounds);
        }
    }

    #[test]
    fn initialize_aims_two_thirds_at_bias() {
        let config = SubdivideConfig {
            divide_rule: DivideRule::TwoThirds,
            max_depth: 8,
            ..fast_config()
        };
        let bias = Point::new(5.0, 5.0);
        let mut orch = Orchestrator::new(square(), config);
        orch.initialize(bias, 4);
        assert_eq!(orch.tree().spatial().focus(), bias);
        let near = orch.tree().spatial().find_node(bias).unwrap();
        let far = orch.tree().spatial().find_node(Point::new(95.0, 95.0)).unwrap();
        let area = |id| orch.tree().spatial().bounds(id).unwrap().area();
        // Every split keeps the bias in its larger piece and (95, 95) in its smaller one.
        assert!((area(near) - square().area() * (2.0_f64 / 3.0).powi(4)).abs() < 1e-6);
        assert!((area(far) - square().area() * (1.0_f64 / 3.0).powi(4)).abs() < 1e-6);
    }

    #[test]
    fn set_config_switches_rule_for_later_divisions() {
        let mut orch = Orchestrator::with_parts(
            square(),
            fast_config(),
            |_: f64, _: f64, _: f64| 1.0,
            ThresholdPolicy::default(),
        );
        orch.set_config(SubdivideConfig {
            divide_rule: DivideRule::ThirdsRow,
            max_depth: 1,
            ..fast_config()
        });
        run(&mut orch, 1000.0, |_| {});
        assert_eq!(orch.leaves().len(), 3);
    }

    #[test]
    #[should_panic(expected = "must be below max_depth")]
    fn invalid_config_fails_fast() {
        let _ = Orchestrator::new(
            square(),
            SubdivideConfig {
                min_depth: 3,
                max_depth: 2,
                ..Default::default()
            },
        );
    }

    #[test]
    fn time_going_backwards_does_not_rewind() {
        let mut orch = Orchestrator::new(square(), fast_config());
        orch.tick(100.0, |_| {});
        orch.tick(150.0, |_| {});
        orch.tick(120.0, |_| {});
        assert_eq!(orch.tree().clock(), 50.0);
    }
}
