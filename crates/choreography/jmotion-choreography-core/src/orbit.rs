//! Joint and hold orbit builder.
//!
//! Turns the anatomy table into per-joint arm chains, per-hand chains and the
//! hold paths the prop choreographer draws from. Everything here depends on
//! the pattern only through [`ChoreographyConfig`], so it is built once per
//! pattern, before any prop.

use serde::{Deserialize, Serialize};

use crate::anatomy::{AnatomyTable, ArcSpec, JointOrbitSpec};
use crate::chain::Chain;
use crate::config::ChoreographyConfig;
use crate::geometry::{Point, Side, SidePair};
use crate::ids::PathId;
use crate::path::{HoldPath, KeyRange, PathRegistry};
use crate::segment::{PathMotion, Segment, ValueSegment};

/// Hold windows of both hands, in cycle-step order.
pub type HoldPaths = SidePair<Vec<HoldPath>>;

#[derive(Clone, Debug)]
pub struct JointOrbits {
    /// One chain per joint, wrist first.
    pub arms: SidePair<Vec<Chain>>,
    pub hands: SidePair<Chain>,
    /// Closed orbit path of every joint, parallel to `arms`.
    pub orbit_paths: SidePair<Vec<PathId>>,
    pub holds: HoldPaths,
}

pub struct OrbitBuilder<'a> {
    anatomy: &'a AnatomyTable,
    timing: &'a ChoreographyConfig,
    name_prefix: &'a str,
}

impl<'a> OrbitBuilder<'a> {
    pub fn new(anatomy: &'a AnatomyTable, timing: &'a ChoreographyConfig, name_prefix: &'a str) -> Self {
        Self {
            anatomy,
            timing,
            name_prefix,
        }
    }

    /// The left arm trails the right by one unit unless both hands throw
    /// together.
    pub fn lagged(&self, side: Side) -> bool {
        side == Side::Left && !self.timing.synchronous
    }

    pub fn build(&self, paths: &mut PathRegistry) -> JointOrbits {
        log::debug!(
            "orbits: {} steps, unit {} ms, synchronous {}",
            self.anatomy.steps(),
            self.timing.unit_ms,
            self.timing.synchronous
        );

        let mut orbit_paths = SidePair::<Vec<PathId>>::default();
        let mut arms = SidePair::<Vec<Chain>>::default();
        for side in Side::BOTH {
            for joint in self.anatomy.joints(side) {
                let path = self.register_orbit(side, joint, paths);
                orbit_paths.get_mut(side).push(path);
                arms.get_mut(side).push(self.arm_chain(side, joint));
            }
        }

        let hands = SidePair::new(
            self.hand_chain(Side::Right, orbit_paths.right.first().copied()),
            self.hand_chain(Side::Left, orbit_paths.left.first().copied()),
        );
        let holds = SidePair::new(
            self.hold_paths(Side::Right, paths),
            self.hold_paths(Side::Left, paths),
        );

        JointOrbits {
            arms,
            hands,
            orbit_paths,
            holds,
        }
    }

    fn chain_name(&self, side: Side, part: &str) -> String {
        if self.name_prefix.is_empty() {
            format!("{}_{part}", side.as_str())
        } else {
            format!("{}_{}_{part}", self.name_prefix, side.as_str())
        }
    }

    fn steps<'j>(&self, joint: &'j JointOrbitSpec) -> &'j [ArcSpec] {
        let steps = self.anatomy.steps().min(joint.arcs.len());
        &joint.arcs[..steps]
    }

    fn register_orbit(&self, side: Side, joint: &JointOrbitSpec, paths: &mut PathRegistry) -> PathId {
        let arcs = self.steps(joint).iter().map(|spec| spec.to_arc()).collect();
        paths.register(format!("{}_{}", side.as_str(), joint.name), arcs, true)
    }

    /// Keyframed chain of one joint: one elliptic arc per step.
    fn arm_chain(&self, side: Side, joint: &JointOrbitSpec) -> Chain {
        let unit = self.timing.unit_ms;
        let steps = self.steps(joint);
        let mut chain = Chain::new(self.chain_name(side, &joint.name));
        let lagged = self.lagged(side);
        if let (true, Some(first)) = (lagged, steps.first()) {
            chain.add_segment(Segment::halt(first.start, unit));
        }
        for spec in steps {
            chain.add_segment(Segment::value(ValueSegment::from_arc(&spec.to_arc()), unit));
        }
        chain.finalize(usize::from(lagged));
        chain
    }

    /// Hand chain: the whole wrist orbit as one path motion.
    fn hand_chain(&self, side: Side, wrist: Option<PathId>) -> Chain {
        let mut chain = Chain::new(self.chain_name(side, "hand"));
        let (Some(path), Some(spec)) = (wrist, self.anatomy.wrist(side)) else {
            return chain;
        };
        let steps = self.steps(spec);
        let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
            return chain;
        };
        let unit = self.timing.unit_ms;
        let lagged = self.lagged(side);
        if lagged {
            chain.add_segment(Segment::halt(first.start, unit));
        }
        let motion = PathMotion {
            path,
            range: KeyRange::Full,
            from: first.start,
            to: last.end,
        };
        chain.add_segment(Segment::along_path(motion, unit * steps.len() as f32));
        chain.finalize(usize::from(lagged));
        chain
    }

    /// Wrist arcs of one hand, shifted to where the prop sits.
    pub fn hold_paths(&self, side: Side, paths: &mut PathRegistry) -> Vec<HoldPath> {
        let Some(wrist) = self.anatomy.wrist(side) else {
            return Vec::new();
        };
        let offset = *self.anatomy.prop_offset.get(side);
        self.steps(wrist)
            .iter()
            .enumerate()
            .map(|(window, spec)| {
                let arc = spec.to_arc().translate(offset);
                let path = paths.register(format!("{}_hold_{window}", side.as_str()), vec![arc], false);
                HoldPath {
                    path,
                    side,
                    window,
                    arc,
                }
            })
            .collect()
    }
}

/// Serializable summary of the hold windows, handy for renderers that only
/// need the reference points.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HoldSummary {
    pub side: Side,
    pub window: usize,
    pub first: Point,
    pub middle: Point,
    pub last: Point,
}

impl From<&HoldPath> for HoldSummary {
    fn from(hold: &HoldPath) -> Self {
        Self {
            side: hold.side,
            window: hold.window,
            first: hold.first(),
            middle: hold.middle(),
            last: hold.last(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn build(synchronous: bool) -> (JointOrbits, PathRegistry) {
        let cfg = Config::default();
        let timing = ChoreographyConfig::for_max_height(3, synchronous, &cfg);
        let mut paths = PathRegistry::new();
        let orbits = OrbitBuilder::new(&cfg.anatomy, &timing, "t").build(&mut paths);
        (orbits, paths)
    }

    #[test]
    fn async_left_arm_is_delayed_by_a_halt() {
        let (orbits, _) = build(false);
        for chain in &orbits.arms.right {
            assert_eq!(chain.loop_index(), Some(0));
            assert!(!chain.segments()[0].is_halt());
            assert_eq!(chain.len(), 2);
        }
        for chain in &orbits.arms.left {
            assert_eq!(chain.loop_index(), Some(1));
            assert!(chain.segments()[0].is_halt());
            assert_eq!(chain.lead_in_ms(), 480.0);
            assert_eq!(chain.cycle_ms(), 960.0);
        }
        assert_eq!(orbits.hands.left.loop_index(), Some(1));
        assert_eq!(orbits.hands.right.loop_index(), Some(0));
    }

    #[test]
    fn sync_arms_start_together() {
        let (orbits, _) = build(true);
        for side in Side::BOTH {
            assert!(orbits.arms.get(side).iter().all(|c| c.loop_index() == Some(0)));
            assert_eq!(orbits.hands.get(side).len(), 1);
            assert_eq!(orbits.hands.get(side).cycle_ms(), 960.0);
        }
    }

    #[test]
    fn halt_pins_orbit_start() {
        let (orbits, _) = build(false);
        let wrist = &orbits.arms.left[0];
        assert_eq!(wrist.segments()[0].start_point(), Some(Point::new(90.0, 10.0)));
        assert_eq!(wrist.segments()[1].start_point(), Some(Point::new(90.0, 10.0)));
        assert_eq!(wrist.name(), "t_left_wrist");
    }

    #[test]
    fn hold_paths_are_offset_wrist_windows() {
        let (orbits, paths) = build(false);
        assert_eq!(orbits.holds.right.len(), 2);
        let h0 = &orbits.holds.right[0];
        assert_eq!(h0.first(), Point::new(-90.0, 0.0));
        assert_eq!(h0.middle(), Point::new(-60.0, 20.0));
        assert_eq!(h0.last(), Point::new(-30.0, 0.0));
        assert_eq!(orbits.holds.right[1].first(), h0.last());
        assert_eq!(paths.get(h0.path).map(|p| p.label.as_str()), Some("right_hold_0"));
        let summary = HoldSummary::from(h0);
        assert_eq!(summary.window, 0);
        // 2 joints per arm + 2 hold windows per hand
        assert_eq!(paths.len(), 8);
    }

    #[test]
    fn orbit_paths_are_closed() {
        let (orbits, paths) = build(false);
        for id in orbits.orbit_paths.right.iter().chain(orbits.orbit_paths.left.iter()) {
            let path = paths.get(*id).expect("orbit");
            assert!(path.closed);
            assert_eq!(path.first(), path.last());
        }
    }
}
