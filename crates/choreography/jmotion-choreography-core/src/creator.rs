//! Top-level entry point: pattern in, choreography out.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::choreographer::{PropChain, PropChoreographer};
use crate::config::{ChoreographyConfig, Config};
use crate::descriptor::KeyframeDescriptor;
use crate::error::PatternError;
use crate::geometry::SidePair;
use crate::ids::PathId;
use crate::orbit::{HoldPaths, HoldSummary, JointOrbits, OrbitBuilder};
use crate::path::PathRegistry;
use crate::pattern::Pattern;

pub struct Creator {
    config: Config,
}

impl Default for Creator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Creator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate `pattern` and build every arm, hand and prop chain for it.
    pub fn calculate_orbits(&self, pattern: &Pattern) -> Result<Orbits, PatternError> {
        pattern.validate()?;

        let timing = ChoreographyConfig::for_pattern(pattern, &self.config);
        log::debug!(
            "pattern: {} props, max height {}, scale {}, unit {} ms",
            pattern.props.len(),
            pattern.max_height(),
            timing.scale,
            timing.unit_ms
        );

        let prefix = self.config.id_prefix.as_str();
        let mut paths = PathRegistry::new();
        let JointOrbits {
            arms,
            hands,
            orbit_paths,
            holds,
        } = OrbitBuilder::new(&self.config.anatomy, &timing, prefix).build(&mut paths);

        let choreographer = PropChoreographer::new(&timing, &holds, prefix);
        let props = pattern
            .props
            .iter()
            .enumerate()
            .map(|(i, prop)| choreographer.choreograph(prop, i))
            .collect();

        Ok(Orbits {
            config: timing,
            id_prefix: self.config.id_prefix.clone(),
            paths,
            arms,
            hands,
            orbit_paths,
            holds,
            props,
        })
    }
}

/// Everything built for one pattern.
#[derive(Clone, Debug)]
pub struct Orbits {
    pub config: ChoreographyConfig,
    pub id_prefix: String,
    pub paths: PathRegistry,
    pub arms: SidePair<Vec<Chain>>,
    pub hands: SidePair<Chain>,
    pub orbit_paths: SidePair<Vec<PathId>>,
    pub holds: HoldPaths,
    /// In pattern order.
    pub props: Vec<PropChain>,
}

/// A registered path ready to be drawn.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PathElement {
    pub id: String,
    pub data: String,
    pub closed: bool,
}

impl Orbits {
    /// Arm chains, then hand chains, then props; right before left.
    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.arms
            .right
            .iter()
            .chain(self.arms.left.iter())
            .chain([&self.hands.right, &self.hands.left])
            .chain(self.props.iter().map(|p| &p.chain))
    }

    pub fn descriptors(&self) -> Vec<KeyframeDescriptor> {
        self.chains()
            .flat_map(|chain| chain.descriptors(&self.paths, &self.id_prefix))
            .collect()
    }

    pub fn path_elements(&self) -> Vec<PathElement> {
        self.paths
            .iter()
            .map(|path| PathElement {
                id: path.element_id(&self.id_prefix),
                data: path.path_data(),
                closed: path.closed,
            })
            .collect()
    }

    /// Paths referenced by at least one prop.
    pub fn referenced_paths(&self) -> BTreeSet<PathId> {
        self.props
            .iter()
            .flat_map(|p| p.referenced_paths.iter().copied())
            .collect()
    }

    /// Hold paths no prop ever plays; a renderer may skip drawing them.
    pub fn unused_paths(&self) -> Vec<PathId> {
        let used = self.referenced_paths();
        self.holds
            .right
            .iter()
            .chain(self.holds.left.iter())
            .map(|h| h.path)
            .filter(|id| !used.contains(id))
            .collect()
    }

    pub fn hold_summaries(&self) -> SidePair<Vec<HoldSummary>> {
        SidePair::new(
            self.holds.right.iter().map(HoldSummary::from).collect(),
            self.holds.left.iter().map(HoldSummary::from).collect(),
        )
    }

    /// Longest lead-in plus longest cycle: enough to see every chain loop.
    pub fn preview_ms(&self) -> f32 {
        let lead = self.chains().map(Chain::lead_in_ms).fold(0.0, f32::max);
        let cycle = self.chains().map(Chain::cycle_ms).fold(0.0, f32::max);
        lead + cycle
    }
}
