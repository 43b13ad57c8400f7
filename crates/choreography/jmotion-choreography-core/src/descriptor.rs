//! Renderer-agnostic keyframe descriptors.
//!
//! A descriptor maps one-to-one onto a SMIL `<animate>` (values payload) or
//! `<animateMotion>` (path payload) element, but no markup is produced here.

use serde::{Deserialize, Serialize};

/// Attribute name used for path-following descriptors.
pub const MOTION_ATTRIBUTE: &str = "motion";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcMode {
    Discrete,
    Linear,
    Spline,
}

impl CalcMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CalcMode::Discrete => "discrete",
            CalcMode::Linear => "linear",
            CalcMode::Spline => "spline",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyframePayload {
    Values { values: Vec<f32> },
    Path { path: String, key_points: [f32; 2] },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyframeDescriptor {
    pub id: String,
    pub attribute: String,
    /// Begin triggers; any one firing starts the element.
    pub begin: Vec<String>,
    pub dur_ms: f32,
    pub calc_mode: CalcMode,
    pub payload: KeyframePayload,
    pub key_times: Vec<f32>,
    /// One `[x1, y1, x2, y2]` per transition, spline mode only.
    pub key_splines: Vec<[f32; 4]>,
}

impl KeyframeDescriptor {
    pub fn begin_expression(&self) -> String {
        self.begin.join(";")
    }

    pub fn dur_expression(&self) -> String {
        format_ms(self.dur_ms)
    }

    pub fn key_times_expression(&self) -> String {
        join_numbers(&self.key_times, ";")
    }

    pub fn key_splines_expression(&self) -> String {
        self.key_splines
            .iter()
            .map(|s| format!("{} {} {} {}", s[0], s[1], s[2], s[3]))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn values_expression(&self) -> Option<String> {
        match &self.payload {
            KeyframePayload::Values { values } => Some(join_numbers(values, ";")),
            KeyframePayload::Path { .. } => None,
        }
    }

    pub fn is_motion(&self) -> bool {
        matches!(self.payload, KeyframePayload::Path { .. })
    }
}

pub fn format_ms(ms: f32) -> String {
    format!("{ms}ms")
}

fn join_numbers(values: &[f32], sep: &str) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expressions() {
        let d = KeyframeDescriptor {
            id: "prop_x_1".into(),
            attribute: "x".into(),
            begin: vec![format_ms(0.0), "prop_x_3.end".into()],
            dur_ms: 480.0,
            calc_mode: CalcMode::Spline,
            payload: KeyframePayload::Values {
                values: vec![-90.0, -60.0, -30.0],
            },
            key_times: vec![0.0, 0.5, 1.0],
            key_splines: vec![[0.25, 0.0, 0.75, 1.0]],
        };
        assert_eq!(d.begin_expression(), "0ms;prop_x_3.end");
        assert_eq!(d.dur_expression(), "480ms");
        assert_eq!(d.key_times_expression(), "0;0.5;1");
        assert_eq!(d.key_splines_expression(), "0.25 0 0.75 1");
        assert_eq!(d.values_expression().as_deref(), Some("-90;-60;-30"));
        assert!(!d.is_motion());
    }

    #[test]
    fn payload_serializes_tagged() {
        let payload = KeyframePayload::Path {
            path: "demo_right_hold_0".into(),
            key_points: [0.0, 0.5],
        };
        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["kind"], "path");
        assert_eq!(json["path"], "demo_right_hold_0");
    }
}
