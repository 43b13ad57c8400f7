//! Fixed anatomical orbit table for the two arms.
//!
//! Each joint traces one elliptical arc per cycle step; consecutive arcs share
//! endpoints so the steps close into a loop. Joint 0 is the wrist, which also
//! carries the hand and, translated by `prop_offset`, the held prop.

use serde::{Deserialize, Serialize};

use crate::arc::EasedArc;
use crate::geometry::{Point, Side, SidePair};

/// Control triple of one elliptical arc.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ArcSpec {
    pub start: Point,
    pub mid: Point,
    pub end: Point,
}

impl ArcSpec {
    pub const fn new(sx: f32, sy: f32, mx: f32, my: f32, ex: f32, ey: f32) -> Self {
        Self {
            start: Point::new(sx, sy),
            mid: Point::new(mx, my),
            end: Point::new(ex, ey),
        }
    }

    pub fn to_arc(&self) -> EasedArc {
        EasedArc::ellipse(self.start, self.mid, self.end)
    }
}

/// Orbit of a single joint, one arc per cycle step.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JointOrbitSpec {
    pub name: String,
    pub arcs: Vec<ArcSpec>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnatomyTable {
    pub right: Vec<JointOrbitSpec>,
    pub left: Vec<JointOrbitSpec>,
    /// Prop position relative to the wrist.
    pub prop_offset: SidePair<Point>,
}

impl AnatomyTable {
    pub fn joints(&self, side: Side) -> &[JointOrbitSpec] {
        match side {
            Side::Right => &self.right,
            Side::Left => &self.left,
        }
    }

    /// Wrist orbit of one arm, if the arm has any joints.
    pub fn wrist(&self, side: Side) -> Option<&JointOrbitSpec> {
        self.joints(side).first()
    }

    /// Number of cycle steps (the shortest joint orbit across both arms).
    pub fn steps(&self) -> usize {
        self.right
            .iter()
            .chain(self.left.iter())
            .map(|joint| joint.arcs.len())
            .min()
            .unwrap_or(0)
    }
}

impl Default for AnatomyTable {
    fn default() -> Self {
        let right = vec![
            JointOrbitSpec {
                name: "wrist".into(),
                arcs: vec![
                    ArcSpec::new(-90.0, 10.0, -60.0, 30.0, -30.0, 10.0),
                    ArcSpec::new(-30.0, 10.0, -60.0, -10.0, -90.0, 10.0),
                ],
            },
            JointOrbitSpec {
                name: "elbow".into(),
                arcs: vec![
                    ArcSpec::new(-70.0, -30.0, -60.0, -23.0, -50.0, -30.0),
                    ArcSpec::new(-50.0, -30.0, -60.0, -37.0, -70.0, -30.0),
                ],
            },
        ];
        let left = right
            .iter()
            .map(|joint| JointOrbitSpec {
                name: joint.name.clone(),
                arcs: joint.arcs.iter().map(mirror).collect(),
            })
            .collect();
        Self {
            right,
            left,
            prop_offset: SidePair::new(Point::new(0.0, -10.0), Point::new(0.0, -10.0)),
        }
    }
}

fn mirror(arc: &ArcSpec) -> ArcSpec {
    let flip = |p: Point| Point::new(-p.x, p.y);
    ArcSpec {
        start: flip(arc.start),
        mid: flip(arc.mid),
        end: flip(arc.end),
    }
}
