//! Registered motion paths and the hold paths built on top of them.
//!
//! Segments never embed path geometry; they carry a [`PathId`] and a
//! [`KeyRange`] and the renderer (or the sampler) resolves the id through the
//! [`PathRegistry`].

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::arc::{ArcHalf, EasedArc};
use crate::geometry::{Point, Side};
use crate::ids::{IdAllocator, PathId};

/// Portion of a path a segment plays, in normalized path progress.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum KeyRange {
    Full,
    FirstHalf,
    SecondHalf,
    Span { from: f32, to: f32 },
}

impl KeyRange {
    pub fn bounds(self) -> [f32; 2] {
        match self {
            KeyRange::Full => [0.0, 1.0],
            KeyRange::FirstHalf => [0.0, 0.5],
            KeyRange::SecondHalf => [0.5, 1.0],
            KeyRange::Span { from, to } => [from.clamp(0.0, 1.0), to.clamp(0.0, 1.0)],
        }
    }
}

/// A drawable path: consecutive arcs, optionally closed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MotionPath {
    pub id: PathId,
    /// Human readable suffix of the element id, e.g. `right_hold_0`.
    pub label: String,
    pub arcs: Vec<EasedArc>,
    pub closed: bool,
}

impl MotionPath {
    pub fn element_id(&self, prefix: &str) -> String {
        if prefix.is_empty() {
            self.label.clone()
        } else {
            format!("{prefix}_{}", self.label)
        }
    }

    pub fn first(&self) -> Option<Point> {
        self.arcs.first().map(|arc| arc.start)
    }

    pub fn last(&self) -> Option<Point> {
        self.arcs.last().map(|arc| arc.end)
    }

    /// First, middle and last point; the middle is at half the path progress.
    pub fn reference_points(&self) -> Option<[Point; 3]> {
        Some([self.first()?, self.point_at(0.5)?, self.last()?])
    }

    /// Point at normalized progress `u`; every arc half covers an equal share.
    pub fn point_at(&self, u: f32) -> Option<Point> {
        let n = self.arcs.len();
        if n == 0 {
            return None;
        }
        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let scaled = u * n as f32;
        let index = (scaled.floor() as usize).min(n - 1);
        Some(self.arcs[index].point_at(scaled - index as f32))
    }

    /// SVG path data: `M` to the start, then one `C` per arc half.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        let Some(start) = self.first() else {
            return d;
        };
        let _ = write!(d, "M{},{}", start.x, start.y);
        for arc in &self.arcs {
            for half in [ArcHalf::First, ArcHalf::Second] {
                let [_, c1, c2, end] = arc.cubic_controls(half);
                let _ = write!(
                    d,
                    " C{},{} {},{} {},{}",
                    c1.x, c1.y, c2.x, c2.y, end.x, end.y
                );
            }
        }
        if self.closed {
            d.push_str(" Z");
        }
        d
    }
}

/// Owner of every path built for one pattern.
#[derive(Clone, Debug, Default)]
pub struct PathRegistry {
    ids: IdAllocator,
    paths: Vec<MotionPath>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, label: impl Into<String>, arcs: Vec<EasedArc>, closed: bool) -> PathId {
        let id = self.ids.alloc_path();
        self.paths.push(MotionPath {
            id,
            label: label.into(),
            arcs,
            closed,
        });
        id
    }

    pub fn get(&self, id: PathId) -> Option<&MotionPath> {
        // Ids are dense and allocated in push order.
        self.paths.get(id.0 as usize).filter(|path| path.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotionPath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Where a prop rests in one hand during one half-cycle window.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct HoldPath {
    pub path: PathId,
    pub side: Side,
    pub window: usize,
    pub arc: EasedArc,
}

impl HoldPath {
    /// Catch point.
    #[inline]
    pub fn first(&self) -> Point {
        self.arc.start
    }

    /// Where a pass (height 1) is caught and released.
    #[inline]
    pub fn middle(&self) -> Point {
        self.arc.mid
    }

    /// Throw point.
    #[inline]
    pub fn last(&self) -> Point {
        self.arc.end
    }

    /// Endpoints of the portion played for `range`.
    pub fn endpoints(&self, range: KeyRange) -> (Point, Point) {
        match range {
            KeyRange::Full => (self.first(), self.last()),
            KeyRange::FirstHalf => (self.first(), self.middle()),
            KeyRange::SecondHalf => (self.middle(), self.last()),
            KeyRange::Span { .. } => {
                let [from, to] = range.bounds();
                (self.arc.point_at(from), self.arc.point_at(to))
            }
        }
    }
}
