//! jmotion choreography core (renderer agnostic)
//!
//! Turns a separated siteswap table (one throw cycle per prop) into loopable
//! chains of motion segments for both arms, both hands and every prop, and
//! lowers those chains into keyframe descriptors a SMIL/SVG renderer can
//! emit verbatim. Markup, notation parsing and playback live elsewhere.

pub mod anatomy;
pub mod arc;
pub mod baking;
pub mod chain;
pub mod choreographer;
pub mod config;
pub mod creator;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod interp;
pub mod orbit;
pub mod path;
pub mod pattern;
pub mod sampling;
pub mod segment;
pub mod spline;

// Re-exports for consumers (renderers)
pub use anatomy::{AnatomyTable, ArcSpec, JointOrbitSpec};
pub use arc::{ArcHalf, EasedArc};
pub use baking::{bake_orbits, export_baked_json, BakedOrbits, BakedTrack, BakingConfig};
pub use chain::Chain;
pub use choreographer::{PropChain, PropChoreographer, ThrowRecord};
pub use config::{ChoreographyConfig, Config, BEAT_DIVISIONS};
pub use creator::{Creator, Orbits, PathElement};
pub use descriptor::{CalcMode, KeyframeDescriptor, KeyframePayload, MOTION_ATTRIBUTE};
pub use error::PatternError;
pub use geometry::{Point, Side, SidePair};
pub use ids::{PathId, SegmentIndex};
pub use orbit::{HoldPaths, HoldSummary, JointOrbits, OrbitBuilder};
pub use path::{HoldPath, KeyRange, MotionPath, PathRegistry};
pub use pattern::{Pattern, PropPattern, MIN_SCALING_HEIGHT};
pub use sampling::{discontinuities, sample_chain};
pub use segment::{Axes, Begin, Segment, SegmentKind};
pub use spline::{AxisSplines, Spline};
