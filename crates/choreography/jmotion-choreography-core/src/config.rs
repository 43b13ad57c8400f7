//! Creator configuration and the per-pattern timing derived from it.

use serde::{Deserialize, Serialize};

use crate::anatomy::AnatomyTable;
use crate::pattern::{Pattern, MIN_SCALING_HEIGHT};

/// Beats per unit, indexed by `max_height - 5`. Equal to
/// `round(120 / (scale * 4 + 6))` in range; the last entry is the floor.
pub const BEAT_DIVISIONS: [u32; 31] = [
    12, 11, 10, 9, 9, 8, 8, 7, 7, 6, 6, 6, 5, 5, 5, 5, 5, 4, 4, 4, 4, 4, 4, 4, 4, 3, 3, 3, 3, 3, 3,
];

/// Static configuration of a [`crate::Creator`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base tick in milliseconds; one unit is a whole number of ticks.
    pub base_tick_ms: f32,
    /// Apex height of a one-unit flight at scale 1.
    pub height_factor: f32,
    /// Prefix of every generated chain and path identifier.
    pub id_prefix: String,
    pub anatomy: AnatomyTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_tick_ms: 40.0,
            height_factor: 15.0,
            id_prefix: "jmotion".into(),
            anatomy: AnatomyTable::default(),
        }
    }
}

/// Timing shared by every joint and prop of one pattern. Built once, then
/// passed by reference through the orbit builder and the choreographer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChoreographyConfig {
    pub scale: f32,
    pub unit_ms: f32,
    pub synchronous: bool,
    /// Line-width hint for the renderer; grows as the beat shortens.
    pub stroke_width: f32,
    pub height_factor: f32,
}

impl ChoreographyConfig {
    pub fn for_pattern(pattern: &Pattern, config: &Config) -> Self {
        Self::for_max_height(pattern.max_height(), pattern.synchronous, config)
    }

    pub fn for_max_height(max_height: u32, synchronous: bool, config: &Config) -> Self {
        let max = max_height.max(MIN_SCALING_HEIGHT);
        let div = ((max - MIN_SCALING_HEIGHT) as usize).min(BEAT_DIVISIONS.len() - 1);
        let beats = BEAT_DIVISIONS[div];
        Self {
            scale: (max - 1) as f32 / 4.0,
            unit_ms: clamp_duration(config.base_tick_ms * beats as f32),
            synchronous,
            stroke_width: BEAT_DIVISIONS[0] as f32 / beats as f32,
            height_factor: config.height_factor,
        }
    }

    #[inline]
    pub fn half_ms(&self) -> f32 {
        self.unit_ms / 2.0
    }

    /// Units a throw of `height` spends airborne.
    #[inline]
    pub fn air_units(height: i32) -> u32 {
        height.unsigned_abs().saturating_sub(1).max(1)
    }

    #[inline]
    pub fn flight_ms(&self, air: u32) -> f32 {
        clamp_duration(self.unit_ms * air as f32)
    }

    /// Apex height above the launch point for a flight of `air` units.
    pub fn flight_height(&self, air: u32) -> f32 {
        let air = air as f32;
        let height = air * air * self.height_factor / self.scale;
        if height.is_finite() {
            height.max(0.0)
        } else {
            0.0
        }
    }
}

/// NaN and negative durations collapse to zero.
#[inline]
pub fn clamp_duration(ms: f32) -> f32 {
    if ms.is_nan() {
        0.0
    } else {
        ms.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisions_follow_rounded_formula() {
        for (i, &beats) in BEAT_DIVISIONS.iter().enumerate() {
            let max = (i as u32 + MIN_SCALING_HEIGHT) as f32;
            let scale = (max - 1.0) / 4.0;
            let formula = (120.0 / (scale * 4.0 + 6.0)).round() as u32;
            assert_eq!(formula.max(3), beats, "max height {max}");
        }
    }

    #[test]
    fn default_cascade_timing() {
        let cfg = ChoreographyConfig::for_max_height(3, false, &Config::default());
        assert_eq!(cfg.scale, 1.0);
        assert_eq!(cfg.unit_ms, 480.0);
        assert_eq!(cfg.half_ms(), 240.0);
        assert_eq!(cfg.stroke_width, 1.0);
    }

    #[test]
    fn unit_floors_at_last_division() {
        let cfg = ChoreographyConfig::for_max_height(99, true, &Config::default());
        assert_eq!(cfg.unit_ms, 120.0);
        assert_eq!(cfg.stroke_width, 4.0);
        assert_eq!(cfg.scale, 24.5);
    }

    #[test]
    fn air_and_height() {
        assert_eq!(ChoreographyConfig::air_units(1), 1);
        assert_eq!(ChoreographyConfig::air_units(3), 2);
        assert_eq!(ChoreographyConfig::air_units(-5), 4);
        let cfg = ChoreographyConfig::for_max_height(5, false, &Config::default());
        assert_eq!(cfg.flight_height(2), 60.0);
        assert_eq!(cfg.flight_ms(2), 960.0);
    }

    #[test]
    fn degenerate_values_clamp() {
        assert_eq!(clamp_duration(f32::NAN), 0.0);
        assert_eq!(clamp_duration(-3.0), 0.0);
        let cfg = Config {
            base_tick_ms: f32::NAN,
            ..Config::default()
        };
        let timing = ChoreographyConfig::for_max_height(5, false, &cfg);
        assert_eq!(timing.unit_ms, 0.0);
    }
}
