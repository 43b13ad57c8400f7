//! Baking API: sample every chain of a choreography at a fixed frame rate.

use serde::{Deserialize, Serialize};

use crate::creator::Orbits;
use crate::geometry::Point;
use crate::sampling::sample_chain;

/// Longest window baked, in preview windows (lead-in plus one cycle).
pub const MAX_PREVIEW_LOOPS: f32 = 16.0;
/// Upper bound on frames per track.
pub const MAX_BAKED_FRAMES: usize = 1 << 16;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakingConfig {
    /// Target frame rate (Hz) for baked samples.
    pub frame_rate: f32,
    /// Window length in milliseconds; if None, one lead-in plus one full cycle.
    pub duration_ms: Option<f32>,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            duration_ms: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakedTrack {
    /// Chain name.
    pub target: String,
    /// Sampled position at each frame; `None` for empty chains.
    pub values: Vec<Option<Point>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakedOrbits {
    pub frame_rate: f32,
    pub duration_ms: f32,
    pub tracks: Vec<BakedTrack>,
}

impl BakedOrbits {
    pub fn frame_count(&self) -> usize {
        self.tracks.first().map_or(0, |t| t.values.len())
    }

    pub fn track(&self, target: &str) -> Option<&BakedTrack> {
        self.tracks.iter().find(|t| t.target == target)
    }
}

/// Bake every chain of `orbits` using the provided config.
pub fn bake_orbits(orbits: &Orbits, cfg: &BakingConfig) -> BakedOrbits {
    let sr = if cfg.frame_rate.is_finite() && cfg.frame_rate > 0.0 {
        cfg.frame_rate
    } else {
        60.0
    };
    let sr = sr.max(1.0);
    let preview = orbits.preview_ms();
    let mut duration = cfg.duration_ms.unwrap_or(preview);
    if !duration.is_finite() || duration < 0.0 {
        log::warn!("baking: invalid duration {duration}, using preview window");
        duration = preview;
    }
    let limit = preview * MAX_PREVIEW_LOOPS;
    if duration > limit {
        log::warn!("baking: duration {duration} ms clamped to {limit} ms");
        duration = limit;
    }
    let span_frames = (duration / 1000.0 * sr).ceil();
    if span_frames >= MAX_BAKED_FRAMES as f32 {
        log::warn!("baking: {span_frames} frames capped to {MAX_BAKED_FRAMES}");
    }
    let frames = span_frames.min(MAX_BAKED_FRAMES as f32) as usize + 1; // inclusive of end

    let tracks = orbits
        .chains()
        .map(|chain| BakedTrack {
            target: chain.name().to_string(),
            values: (0..frames)
                .map(|f| {
                    let t = (f as f32 * 1000.0 / sr).min(duration);
                    sample_chain(chain, &orbits.paths, t)
                })
                .collect(),
        })
        .collect();

    BakedOrbits {
        frame_rate: sr,
        duration_ms: duration,
        tracks,
    }
}

/// Export baked data as serde_json::Value (stable schema for serialization).
pub fn export_baked_json(baked: &BakedOrbits) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}
