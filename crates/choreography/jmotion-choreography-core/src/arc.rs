//! Two-half eased arcs: the shape shared by joint orbits, hold paths and
//! prop flights.
//!
//! An arc runs `start -> mid -> end`. Each half carries one spline per axis;
//! a half that is axis-aligned (zero dx or zero dy) degrades to linear on both
//! axes so it stays a straight line.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::interp::lerp_f32;
use crate::spline::{AxisSplines, Spline};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcHalf {
    First,
    Second,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct EasedArc {
    pub start: Point,
    pub mid: Point,
    pub end: Point,
    pub first: AxisSplines,
    pub second: AxisSplines,
}

#[inline]
fn is_straight(a: Point, b: Point) -> bool {
    b.x - a.x == 0.0 || b.y - a.y == 0.0
}

impl EasedArc {
    /// Quarter-ellipse halves: horizontal accel into the apex, then decel out.
    pub fn ellipse(start: Point, mid: Point, end: Point) -> Self {
        Self::with_splines(
            start,
            mid,
            end,
            AxisSplines::new(Spline::EllipseAccel, Spline::EllipseDecel),
            AxisSplines::new(Spline::EllipseDecel, Spline::EllipseAccel),
        )
    }

    /// Flight arc: linear horizontally, decelerating up to the apex and
    /// accelerating back down.
    pub fn parabola(start: Point, apex: Point, end: Point) -> Self {
        Self::with_splines(
            start,
            apex,
            end,
            AxisSplines::new(Spline::Linear, Spline::ParabolaDecel),
            AxisSplines::new(Spline::Linear, Spline::ParabolaAccel),
        )
    }

    fn with_splines(
        start: Point,
        mid: Point,
        end: Point,
        first: AxisSplines,
        second: AxisSplines,
    ) -> Self {
        let first = if is_straight(start, mid) {
            AxisSplines::LINEAR
        } else {
            first
        };
        let second = if is_straight(mid, end) {
            AxisSplines::LINEAR
        } else {
            second
        };
        Self {
            start,
            mid,
            end,
            first,
            second,
        }
    }

    pub fn translate(&self, offset: Point) -> Self {
        Self {
            start: self.start.translate(offset),
            mid: self.mid.translate(offset),
            end: self.end.translate(offset),
            ..*self
        }
    }

    /// Endpoints and easing of one half.
    pub fn half(&self, half: ArcHalf) -> (Point, Point, AxisSplines) {
        match half {
            ArcHalf::First => (self.start, self.mid, self.first),
            ArcHalf::Second => (self.mid, self.end, self.second),
        }
    }

    /// Point on one half for curve parameter `s` in [0,1].
    pub fn point_in_half(&self, half: ArcHalf, s: f32) -> Point {
        let (a, b, splines) = self.half(half);
        Point::new(
            lerp_f32(a.x, b.x, splines.x.progress_at(s)),
            lerp_f32(a.y, b.y, splines.y.progress_at(s)),
        )
    }

    /// Point on the whole arc; each half covers an equal share of `s`.
    pub fn point_at(&self, s: f32) -> Point {
        let s = s.clamp(0.0, 1.0);
        if s <= 0.5 {
            self.point_in_half(ArcHalf::First, s * 2.0)
        } else {
            self.point_in_half(ArcHalf::Second, s * 2.0 - 1.0)
        }
    }

    /// Cubic bezier control points `[p0, c1, c2, p3]` of one half.
    pub fn cubic_controls(&self, half: ArcHalf) -> [Point; 4] {
        let (a, b, splines) = self.half(half);
        let [x1, x2] = splines.x.values();
        let [y1, y2] = splines.y.values();
        [
            a,
            Point::new(lerp_f32(a.x, b.x, x1), lerp_f32(a.y, b.y, y1)),
            Point::new(lerp_f32(a.x, b.x, x2), lerp_f32(a.y, b.y, y2)),
            b,
        ]
    }
}
