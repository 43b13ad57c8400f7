//! Atomic motion units of a chain.
//!
//! The variant set is closed: keyframed values, an instantaneous hold, path
//! following and two-phase flight. Everything a renderer needs comes out of
//! [`Segment::descriptors`].

use serde::{Deserialize, Serialize};

use crate::arc::EasedArc;
use crate::config::clamp_duration;
use crate::descriptor::{format_ms, CalcMode, KeyframeDescriptor, KeyframePayload, MOTION_ATTRIBUTE};
use crate::geometry::Point;
use crate::ids::{PathId, SegmentIndex};
use crate::interp::lerp_f32;
use crate::path::{HoldPath, KeyRange, PathRegistry};
use crate::spline::AxisSplines;

/// Start trigger of a segment. Several triggers mean "whichever fires first".
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Begin {
    /// Absolute offset from document start.
    Offset { ms: f32 },
    /// When another segment of the same chain ends.
    AfterEnd { segment: SegmentIndex },
}

impl Begin {
    pub fn offset(ms: f32) -> Self {
        Begin::Offset {
            ms: clamp_duration(ms),
        }
    }

    pub fn after(index: usize) -> Self {
        Begin::AfterEnd {
            segment: SegmentIndex(index),
        }
    }
}

/// Planar keyframes with one easing pair per transition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValueSegment {
    points: Vec<Point>,
    splines: Vec<AxisSplines>,
    /// Relative time share of each transition.
    weights: Vec<f32>,
}

impl ValueSegment {
    /// Keyframes with equal time per transition. Missing splines are linear.
    pub fn new(points: Vec<Point>, mut splines: Vec<AxisSplines>) -> Self {
        let transitions = points.len().saturating_sub(1);
        splines.resize(transitions, AxisSplines::LINEAR);
        Self {
            weights: vec![1.0; transitions],
            points,
            splines,
        }
    }

    pub fn from_arc(arc: &EasedArc) -> Self {
        Self::new(vec![arc.start, arc.mid, arc.end], vec![arc.first, arc.second])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn splines(&self) -> &[AxisSplines] {
        &self.splines
    }

    /// Override the time share of each transition. Ignored on a length
    /// mismatch or when the weights do not sum to a positive value.
    pub fn with_weights(mut self, weights: Vec<f32>) -> Self {
        let total: f32 = weights.iter().map(|w| clamp_duration(*w)).sum();
        if weights.len() == self.weights.len() && total > 0.0 {
            self.weights = weights.into_iter().map(clamp_duration).collect();
        }
        self
    }

    /// Normalized key times, starting at 0 and ending at 1.
    pub fn key_times(&self) -> Vec<f32> {
        let total: f32 = self.weights.iter().sum();
        let mut times = Vec::with_capacity(self.weights.len() + 1);
        times.push(0.0);
        let mut sum = 0.0;
        for w in &self.weights {
            sum += w;
            times.push(if total > 0.0 { sum / total } else { 0.0 });
        }
        times
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Position at segment progress `p` in [0,1].
    pub fn point_at(&self, p: f32) -> Option<Point> {
        let first = self.first()?;
        // Deserialized data may disagree on lengths; play what lines up.
        let transitions = self
            .splines
            .len()
            .min(self.points.len() - 1)
            .min(self.weights.len());
        if transitions == 0 {
            return Some(first);
        }
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let times = self.key_times();
        let i = (0..transitions)
            .find(|&i| times.get(i + 1).is_some_and(|&end| p <= end))
            .unwrap_or(transitions - 1);
        let (t0, t1) = (times[i], times[i + 1]);
        let span = t1 - t0;
        let t = if span > 0.0 { (p - t0) / span } else { 1.0 };
        let (a, b, s) = (self.points[i], self.points[i + 1], self.splines[i]);
        Some(Point::new(
            lerp_f32(a.x, b.x, s.x.ease(t)),
            lerp_f32(a.y, b.y, s.y.ease(t)),
        ))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct HaltSegment {
    pub point: Point,
}

/// Follows part of a registered path.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PathMotion {
    pub path: PathId,
    pub range: KeyRange,
    pub from: Point,
    pub to: Point,
}

impl PathMotion {
    pub fn along_hold(hold: &HoldPath, range: KeyRange) -> Self {
        let (from, to) = hold.endpoints(range);
        Self {
            path: hold.path,
            range,
            from,
            to,
        }
    }
}

/// Launch, apex and catch of a flight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParabolicSegment {
    pub flight: EasedArc,
}

impl ParabolicSegment {
    pub fn launch(&self) -> Point {
        self.flight.start
    }

    pub fn apex(&self) -> Point {
        self.flight.mid
    }

    pub fn catch(&self) -> Point {
        self.flight.end
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentKind {
    Value(ValueSegment),
    Halt(HaltSegment),
    MotionAlongPath(PathMotion),
    Parabolic(ParabolicSegment),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    name: String,
    suffix: Option<usize>,
    duration_ms: f32,
    begins: Vec<Begin>,
    kind: SegmentKind,
}

impl Segment {
    pub fn new(kind: SegmentKind, duration_ms: f32) -> Self {
        Self {
            name: String::new(),
            suffix: None,
            duration_ms: clamp_duration(duration_ms),
            begins: Vec::new(),
            kind,
        }
    }

    pub fn value(values: ValueSegment, duration_ms: f32) -> Self {
        Self::new(SegmentKind::Value(values), duration_ms)
    }

    pub fn halt(point: Point, duration_ms: f32) -> Self {
        Self::new(SegmentKind::Halt(HaltSegment { point }), duration_ms)
    }

    pub fn along_path(motion: PathMotion, duration_ms: f32) -> Self {
        Self::new(SegmentKind::MotionAlongPath(motion), duration_ms)
    }

    pub fn hold(hold: &HoldPath, range: KeyRange, duration_ms: f32) -> Self {
        Self::along_path(PathMotion::along_hold(hold, range), duration_ms)
    }

    pub fn parabolic(flight: EasedArc, duration_ms: f32) -> Self {
        Self::new(SegmentKind::Parabolic(ParabolicSegment { flight }), duration_ms)
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    pub fn is_parabolic(&self) -> bool {
        matches!(self.kind, SegmentKind::Parabolic(_))
    }

    pub fn is_halt(&self) -> bool {
        matches!(self.kind, SegmentKind::Halt(_))
    }

    /// Path followed by this segment, if any.
    pub fn path(&self) -> Option<PathId> {
        match &self.kind {
            SegmentKind::MotionAlongPath(motion) => Some(motion.path),
            _ => None,
        }
    }

    pub fn set_id(&mut self, name: &str, suffix: Option<usize>) -> &mut Self {
        self.name = name.to_string();
        self.suffix = suffix;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element id of this segment's descriptor for `attribute`.
    pub fn descriptor_id(&self, attribute: &str) -> String {
        match self.suffix {
            Some(suffix) => format!("{}_{attribute}_{suffix}", self.name),
            None => format!("{}_{attribute}", self.name),
        }
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn set_duration(&mut self, ms: f32) -> &mut Self {
        self.duration_ms = clamp_duration(ms);
        self
    }

    /// Register a trigger; duplicates are ignored.
    pub fn add_begin(&mut self, begin: Begin) -> &mut Self {
        if !self.begins.contains(&begin) {
            self.begins.push(begin);
        }
        self
    }

    /// Replace all triggers with `begin`.
    pub fn set_begin(&mut self, begin: Begin) -> &mut Self {
        self.begins.clear();
        self.begins.push(begin);
        self
    }

    pub fn clear_begins(&mut self) -> &mut Self {
        self.begins.clear();
        self
    }

    pub fn begins(&self) -> &[Begin] {
        &self.begins
    }

    pub fn start_point(&self) -> Option<Point> {
        match &self.kind {
            SegmentKind::Value(values) => values.first(),
            SegmentKind::Halt(halt) => Some(halt.point),
            SegmentKind::MotionAlongPath(motion) => Some(motion.from),
            SegmentKind::Parabolic(flight) => Some(flight.launch()),
        }
    }

    pub fn end_point(&self) -> Option<Point> {
        match &self.kind {
            SegmentKind::Value(values) => values.last(),
            SegmentKind::Halt(halt) => Some(halt.point),
            SegmentKind::MotionAlongPath(motion) => Some(motion.to),
            SegmentKind::Parabolic(flight) => Some(flight.catch()),
        }
    }

    /// Position at segment progress `p` in [0,1]. Path motion needs the
    /// registry that owns its path.
    pub fn point_at(&self, p: f32, paths: &PathRegistry) -> Option<Point> {
        match &self.kind {
            SegmentKind::Value(values) => values.point_at(p),
            SegmentKind::Halt(halt) => Some(halt.point),
            SegmentKind::MotionAlongPath(motion) => {
                let [from, to] = motion.range.bounds();
                let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
                paths.get(motion.path)?.point_at(lerp_f32(from, to, p))
            }
            SegmentKind::Parabolic(flight) => ValueSegment::from_arc(&flight.flight).point_at(p),
        }
    }

    /// Attributes this segment animates, given the chain's axis names.
    pub fn attributes<'a>(&self, axes: &'a Axes) -> Vec<&'a str> {
        match self.kind {
            SegmentKind::MotionAlongPath(_) => vec![MOTION_ATTRIBUTE],
            _ => vec![axes.x.as_str(), axes.y.as_str()],
        }
    }

    /// Build the descriptors of this segment. `end_ref` turns a structural
    /// reference plus the attribute being animated into an element id.
    pub fn descriptors(
        &self,
        axes: &Axes,
        paths: &PathRegistry,
        path_prefix: &str,
        end_ref: impl Fn(SegmentIndex, &str) -> Option<String>,
    ) -> Vec<KeyframeDescriptor> {
        let begin_for = |attribute: &str| -> Vec<String> {
            self.begins
                .iter()
                .filter_map(|b| match *b {
                    Begin::Offset { ms } => Some(format_ms(ms)),
                    Begin::AfterEnd { segment } => {
                        end_ref(segment, attribute).map(|id| format!("{id}.end"))
                    }
                })
                .collect()
        };

        match &self.kind {
            SegmentKind::Value(values) => self.planar(axes, values, &begin_for),
            SegmentKind::Parabolic(flight) => {
                self.planar(axes, &ValueSegment::from_arc(&flight.flight), &begin_for)
            }
            SegmentKind::Halt(halt) => [(&axes.x, halt.point.x), (&axes.y, halt.point.y)]
                .into_iter()
                .map(|(attribute, value)| KeyframeDescriptor {
                    id: self.descriptor_id(attribute),
                    attribute: attribute.clone(),
                    begin: begin_for(attribute),
                    dur_ms: self.duration_ms,
                    calc_mode: CalcMode::Discrete,
                    payload: KeyframePayload::Values {
                        values: vec![value],
                    },
                    key_times: vec![0.0],
                    key_splines: Vec::new(),
                })
                .collect(),
            SegmentKind::MotionAlongPath(motion) => {
                let path = paths
                    .get(motion.path)
                    .map(|p| p.element_id(path_prefix))
                    .unwrap_or_default();
                vec![KeyframeDescriptor {
                    id: self.descriptor_id(MOTION_ATTRIBUTE),
                    attribute: MOTION_ATTRIBUTE.to_string(),
                    begin: begin_for(MOTION_ATTRIBUTE),
                    dur_ms: self.duration_ms,
                    calc_mode: CalcMode::Linear,
                    payload: KeyframePayload::Path {
                        path,
                        key_points: motion.range.bounds(),
                    },
                    key_times: vec![0.0, 1.0],
                    key_splines: Vec::new(),
                }]
            }
        }
    }

    fn planar(
        &self,
        axes: &Axes,
        values: &ValueSegment,
        begin_for: &dyn Fn(&str) -> Vec<String>,
    ) -> Vec<KeyframeDescriptor> {
        let key_times = values.key_times();
        let mut out = Vec::with_capacity(2);
        for (attribute, is_x) in [(&axes.x, true), (&axes.y, false)] {
            let coords = values
                .points
                .iter()
                .map(|p| if is_x { p.x } else { p.y })
                .collect();
            let key_splines = values
                .splines
                .iter()
                .map(|s| (if is_x { s.x } else { s.y }).key_spline())
                .collect();
            out.push(KeyframeDescriptor {
                id: self.descriptor_id(attribute),
                attribute: attribute.clone(),
                begin: begin_for(attribute),
                dur_ms: self.duration_ms,
                calc_mode: CalcMode::Spline,
                payload: KeyframePayload::Values { values: coords },
                key_times: key_times.clone(),
                key_splines,
            });
        }
        out
    }
}

/// Attribute names a chain animates for its two planar axes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Axes {
    pub x: String,
    pub y: String,
}

impl Axes {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::new("x", "y")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side;
    use crate::spline::Spline;

    fn hold() -> HoldPath {
        HoldPath {
            path: PathId(0),
            side: Side::Right,
            window: 0,
            arc: EasedArc::ellipse(
                Point::new(-90.0, 0.0),
                Point::new(-60.0, 20.0),
                Point::new(-30.0, 0.0),
            ),
        }
    }

    #[test]
    fn add_begin_is_a_set() {
        let mut seg = Segment::halt(Point::ORIGIN, 480.0);
        seg.add_begin(Begin::offset(0.0))
            .add_begin(Begin::after(2))
            .add_begin(Begin::offset(0.0))
            .add_begin(Begin::after(2));
        assert_eq!(seg.begins(), &[Begin::offset(0.0), Begin::after(2)]);
        seg.set_begin(Begin::after(1));
        assert_eq!(seg.begins(), &[Begin::after(1)]);
    }

    #[test]
    fn durations_clamp() {
        let mut seg = Segment::halt(Point::ORIGIN, f32::NAN);
        assert_eq!(seg.duration_ms(), 0.0);
        seg.set_duration(-5.0);
        assert_eq!(seg.duration_ms(), 0.0);
    }

    #[test]
    fn ids_with_and_without_suffix() {
        let mut seg = Segment::halt(Point::ORIGIN, 1.0);
        seg.set_id("prop_0", None);
        assert_eq!(seg.descriptor_id("x"), "prop_0_x");
        seg.set_id("prop_0", Some(3));
        assert_eq!(seg.descriptor_id("y"), "prop_0_y_3");
    }

    #[test]
    fn hold_segment_endpoints() {
        let h = hold();
        let seg = Segment::hold(&h, KeyRange::SecondHalf, 240.0);
        assert_eq!(seg.start_point(), Some(h.middle()));
        assert_eq!(seg.end_point(), Some(h.last()));
        assert_eq!(seg.path(), Some(PathId(0)));
    }

    #[test]
    fn value_segment_key_times_and_weights() {
        let arc = hold().arc;
        let values = ValueSegment::from_arc(&arc);
        assert_eq!(values.key_times(), vec![0.0, 0.5, 1.0]);
        let weighted = values.clone().with_weights(vec![1.0, 3.0]);
        assert_eq!(weighted.key_times(), vec![0.0, 0.25, 1.0]);
        let ignored = values.with_weights(vec![1.0]);
        assert_eq!(ignored.key_times(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn value_segment_samples_keyframes() {
        let arc = hold().arc;
        let values = ValueSegment::from_arc(&arc);
        let at = |p| values.point_at(p).expect("point");
        assert!(at(0.0).distance(arc.start) < 1e-3);
        assert!(at(0.5).distance(arc.mid) < 1e-3);
        assert!(at(1.0).distance(arc.end) < 1e-3);
    }

    #[test]
    fn mismatched_keyframes_do_not_panic() {
        let values = ValueSegment::from_arc(&hold().arc);
        let mut json = serde_json::to_value(&values).expect("serialize");
        json["splines"] = serde_json::json!([]);
        let loaded: ValueSegment = serde_json::from_value(json).expect("deserialize");
        assert_eq!(loaded.point_at(0.7), loaded.first());

        let mut json = serde_json::to_value(&values).expect("serialize");
        json["points"] = serde_json::json!([{ "x": 1.0, "y": 2.0 }, { "x": 3.0, "y": 4.0 }]);
        let loaded: ValueSegment = serde_json::from_value(json).expect("deserialize");
        let end = loaded.point_at(1.0).expect("point");
        assert!(end.distance(Point::new(3.0, 4.0)) < 1e-3);
    }

    #[test]
    fn planar_descriptors() {
        let mut seg = Segment::parabolic(
            EasedArc::parabola(
                Point::new(-30.0, 0.0),
                Point::new(0.0, -60.0),
                Point::new(30.0, 0.0),
            ),
            960.0,
        );
        seg.set_id("p", Some(1)).add_begin(Begin::after(0));
        let paths = PathRegistry::new();
        let ds = seg.descriptors(&Axes::default(), &paths, "", |i, attr| {
            Some(format!("p_{attr}_{}", i.0))
        });
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].id, "p_x_1");
        assert_eq!(ds[0].begin, vec!["p_x_0.end".to_string()]);
        assert_eq!(ds[1].attribute, "y");
        assert_eq!(
            ds[1].payload,
            KeyframePayload::Values {
                values: vec![0.0, -60.0, 0.0]
            }
        );
        assert_eq!(
            ds[1].key_splines,
            vec![
                Spline::ParabolaDecel.key_spline(),
                Spline::ParabolaAccel.key_spline()
            ]
        );
        assert_eq!(ds[0].key_splines[0], Spline::Linear.key_spline());
    }

    #[test]
    fn halt_and_motion_descriptors() {
        let mut paths = PathRegistry::new();
        let h = hold();
        let id = paths.register("right_hold_0", vec![h.arc], false);
        let h = HoldPath { path: id, ..h };

        let mut halt = Segment::halt(h.first(), 480.0);
        halt.set_id("prop", Some(0)).add_begin(Begin::offset(0.0));
        let ds = halt.descriptors(&Axes::default(), &paths, "demo", |_, _| None);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].calc_mode, CalcMode::Discrete);
        assert_eq!(ds[0].begin_expression(), "0ms");

        let mut motion = Segment::hold(&h, KeyRange::FirstHalf, 240.0);
        motion.set_id("prop", Some(1)).add_begin(Begin::after(0));
        let ds = motion.descriptors(&Axes::default(), &paths, "demo", |i, attr| {
            assert_eq!(attr, MOTION_ATTRIBUTE);
            Some(format!("prop_x_{}", i.0))
        });
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].id, "prop_motion_1");
        assert_eq!(ds[0].begin_expression(), "prop_x_0.end");
        assert_eq!(
            ds[0].payload,
            KeyframePayload::Path {
                path: "demo_right_hold_0".into(),
                key_points: [0.0, 0.5]
            }
        );
    }
}
