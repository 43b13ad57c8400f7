//! Easing splines attached to keyframe transitions.
//!
//! Every spline keeps its time controls at 1/3 and 2/3, so only the two
//! progress values differ between kinds. With time controls on the thirds the
//! bezier's time axis is the identity, which is why the same two values also
//! serve as cubic path control points (see [`crate::arc`]).

use serde::{Deserialize, Serialize};

use crate::interp::{bezier_ease_t, cubic_bezier};

/// Circular-arc bezier constant `(sqrt(2) - 1) * 4 / 3`.
pub const ELLIPSE_FACTOR: f32 = 0.552_284_8;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spline {
    Linear,
    EllipseAccel,
    EllipseDecel,
    ParabolaAccel,
    ParabolaDecel,
}

impl Spline {
    /// Progress values at the 1/3 and 2/3 time controls.
    pub fn values(self) -> [f32; 2] {
        match self {
            Spline::Linear => [1.0 / 3.0, 2.0 / 3.0],
            Spline::ParabolaAccel => [0.0, 1.0 / 3.0],
            Spline::ParabolaDecel => [2.0 / 3.0, 1.0],
            Spline::EllipseAccel => [0.0, 1.0 - ELLIPSE_FACTOR],
            Spline::EllipseDecel => [ELLIPSE_FACTOR, 1.0],
        }
    }

    /// SMIL `keySplines` entry: `[x1, y1, x2, y2]`.
    pub fn key_spline(self) -> [f32; 4] {
        let [v1, v2] = self.values();
        [1.0 / 3.0, v1, 2.0 / 3.0, v2]
    }

    /// Eased progress for normalized time `t`.
    pub fn ease(self, t: f32) -> f32 {
        let [x1, y1, x2, y2] = self.key_spline();
        bezier_ease_t(t, x1, y1, x2, y2)
    }

    /// Progress along the cubic for curve parameter `s` (no time inversion).
    pub fn progress_at(self, s: f32) -> f32 {
        let [v1, v2] = self.values();
        cubic_bezier(0.0, v1, v2, 1.0, s.clamp(0.0, 1.0))
    }
}

/// Easing pair for a planar transition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AxisSplines {
    pub x: Spline,
    pub y: Spline,
}

impl AxisSplines {
    pub const LINEAR: Self = Self {
        x: Spline::Linear,
        y: Spline::Linear,
    };

    #[inline]
    pub const fn new(x: Spline, y: Spline) -> Self {
        Self { x, y }
    }
}
