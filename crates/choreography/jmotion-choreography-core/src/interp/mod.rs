//! Interpolation helpers shared by sampling and path geometry.
//!
//! Keyframe timing is always a cubic bezier over normalized time; values are
//! blended linearly per axis once the eased progress is known.

pub mod functions;

pub use functions::{bezier_ease_t, cubic_bezier, lerp_f32};
