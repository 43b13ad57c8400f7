//! Ordered, self-looping sequences of segments.
//!
//! After [`Chain::finalize`] the chain plays segments `0..loop_index` once as
//! a lead-in and then repeats `loop_index..` forever: segment 0 starts at the
//! chain offset, every later segment starts when its predecessor ends, and the
//! loop anchor additionally restarts when the last segment ends.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::descriptor::KeyframeDescriptor;
use crate::ids::{PathId, SegmentIndex};
use crate::path::PathRegistry;
use crate::segment::{Axes, Begin, Segment};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Chain {
    name: String,
    axes: Axes,
    start_offset_ms: f32,
    segments: Vec<Segment>,
    loop_index: Option<usize>,
}

impl Chain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axes: Axes::default(),
            start_offset_ms: 0.0,
            segments: Vec::new(),
            loop_index: None,
        }
    }

    pub fn with_start_offset(mut self, ms: f32) -> Self {
        self.start_offset_ms = crate::config::clamp_duration(ms);
        self
    }

    pub fn add_segment(&mut self, segment: Segment) -> SegmentIndex {
        self.segments.push(segment);
        SegmentIndex(self.segments.len() - 1)
    }

    /// Rename the chain and every segment, suffixing by position when the
    /// chain holds more than one segment.
    pub fn set_id(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self.apply_ids();
        self
    }

    fn apply_ids(&mut self) {
        let numbered = self.segments.len() > 1;
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.set_id(&self.name, numbered.then_some(i));
        }
    }

    /// Wire the begin triggers and close the loop at `loop_index`.
    ///
    /// An empty chain is left untouched. An out-of-range anchor is clamped to
    /// the last segment.
    pub fn finalize(&mut self, loop_index: usize) -> &mut Self {
        let Some(last) = self.segments.len().checked_sub(1) else {
            return self;
        };
        let anchor = if loop_index > last {
            log::warn!(
                "chain '{}': loop index {loop_index} out of range, clamped to {last}",
                self.name
            );
            last
        } else {
            loop_index
        };

        self.apply_ids();
        let start = Begin::offset(self.start_offset_ms);
        for (i, segment) in self.segments.iter_mut().enumerate() {
            if i == 0 {
                segment.set_begin(start);
            } else {
                segment.set_begin(Begin::after(i - 1));
            }
        }
        self.segments[anchor].add_begin(Begin::after(last));
        self.loop_index = Some(anchor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn start_offset_ms(&self) -> f32 {
        self.start_offset_ms
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Loop anchor, once finalized.
    pub fn loop_index(&self) -> Option<usize> {
        self.loop_index
    }

    /// Loop anchor bounded by the segment count; a deserialized chain may
    /// carry any index.
    fn anchor(&self) -> usize {
        self.loop_index.unwrap_or(0).min(self.segments.len())
    }

    pub fn lead_in(&self) -> &[Segment] {
        &self.segments[..self.anchor()]
    }

    pub fn body(&self) -> &[Segment] {
        &self.segments[self.anchor()..]
    }

    pub fn lead_in_ms(&self) -> f32 {
        self.lead_in().iter().map(Segment::duration_ms).sum()
    }

    pub fn cycle_ms(&self) -> f32 {
        self.body().iter().map(Segment::duration_ms).sum()
    }

    pub fn parabolic_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_parabolic()).count()
    }

    pub fn referenced_paths(&self) -> BTreeSet<PathId> {
        self.segments.iter().filter_map(Segment::path).collect()
    }

    /// Keyframe descriptors of every segment, in chain order.
    pub fn descriptors(&self, paths: &PathRegistry, path_prefix: &str) -> Vec<KeyframeDescriptor> {
        let end_ref = |index: SegmentIndex, attribute: &str| -> Option<String> {
            let target = self.segments.get(index.0)?;
            let attributes = target.attributes(&self.axes);
            let attribute = if attributes.contains(&attribute) {
                attribute
            } else {
                attributes.first().copied()?
            };
            Some(target.descriptor_id(attribute))
        };
        self.segments
            .iter()
            .flat_map(|segment| segment.descriptors(&self.axes, paths, path_prefix, end_ref))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn halts(n: usize) -> Chain {
        let mut chain = Chain::new("c");
        for i in 0..n {
            chain.add_segment(Segment::halt(Point::new(i as f32, 0.0), 100.0));
        }
        chain
    }

    #[test]
    fn empty_chain_is_noop() {
        let mut chain = Chain::new("empty");
        chain.finalize(0);
        assert_eq!(chain.loop_index(), None);
        assert!(chain.descriptors(&PathRegistry::new(), "").is_empty());
    }

    #[test]
    fn finalize_wires_triggers() {
        let mut chain = halts(4);
        chain.finalize(1);
        let begins: Vec<_> = chain.segments().iter().map(|s| s.begins().to_vec()).collect();
        assert_eq!(begins[0], vec![Begin::offset(0.0)]);
        assert_eq!(begins[1], vec![Begin::after(0), Begin::after(3)]);
        assert_eq!(begins[2], vec![Begin::after(1)]);
        assert_eq!(begins[3], vec![Begin::after(2)]);
        assert_eq!(chain.lead_in().len(), 1);
        assert_eq!(chain.body().len(), 3);
        assert_eq!(chain.lead_in_ms(), 100.0);
        assert_eq!(chain.cycle_ms(), 300.0);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut chain = halts(3);
        chain.finalize(0);
        let once = chain.clone();
        chain.finalize(0);
        assert_eq!(chain, once);
    }

    #[test]
    fn single_segment_loops_on_itself() {
        let mut chain = halts(1).with_start_offset(480.0);
        chain.finalize(0);
        assert_eq!(
            chain.segments()[0].begins(),
            &[Begin::offset(480.0), Begin::after(0)]
        );
        let ds = chain.descriptors(&PathRegistry::new(), "");
        assert_eq!(ds[0].id, "c_x");
        assert_eq!(ds[0].begin_expression(), "480ms;c_x.end");
    }

    #[test]
    fn out_of_range_anchor_clamps() {
        let mut chain = halts(2);
        chain.finalize(9);
        assert_eq!(chain.loop_index(), Some(1));
    }

    #[test]
    fn deserialized_anchor_past_the_end_is_bounded() {
        let mut chain = halts(2);
        chain.finalize(1);
        let mut json = serde_json::to_value(&chain).expect("serialize");
        json["loop_index"] = serde_json::json!(9);
        let loaded: Chain = serde_json::from_value(json).expect("deserialize");
        assert_eq!(loaded.loop_index(), Some(9));
        assert_eq!(loaded.lead_in().len(), 2);
        assert!(loaded.body().is_empty());
        assert_eq!(loaded.cycle_ms(), 0.0);
    }

    #[test]
    fn set_id_suffixes_by_position() {
        let mut chain = halts(2);
        chain.set_id("prop_0").finalize(0);
        let ds = chain.descriptors(&PathRegistry::new(), "");
        let ids: Vec<_> = ds.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["prop_0_x_0", "prop_0_y_0", "prop_0_x_1", "prop_0_y_1"]);
        assert_eq!(ds[2].begin_expression(), "prop_0_x_0.end");
        assert_eq!(ds[0].begin_expression(), "0ms;prop_0_x_1.end");
    }
}
