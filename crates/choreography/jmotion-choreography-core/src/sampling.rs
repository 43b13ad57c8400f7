//! Time-domain sampling of finalized chains.
//!
//! Model:
//! - Before the chain offset the element sits at its first point.
//! - The lead-in (`0..loop_index`) plays once.
//! - The body (`loop_index..`) then repeats forever.
//!
//! This mirrors how the begin triggers wired by [`Chain::finalize`] play out
//! in a SMIL timeline, which makes it usable for previews and tests.

use crate::chain::Chain;
use crate::geometry::Point;
use crate::path::PathRegistry;
use crate::segment::Segment;

/// Position of `chain` at `t_ms` milliseconds after document start.
pub fn sample_chain(chain: &Chain, paths: &PathRegistry, t_ms: f32) -> Option<Point> {
    let first = chain.segments().first()?;
    let t_ms = if t_ms.is_nan() { 0.0 } else { t_ms };
    let t = t_ms - chain.start_offset_ms();
    if t < 0.0 {
        return first.start_point();
    }

    let lead = chain.lead_in_ms();
    if t < lead {
        return sample_run(chain.lead_in(), paths, t);
    }

    let body = chain.body();
    let cycle = chain.cycle_ms();
    if cycle <= 0.0 {
        return body.last().and_then(Segment::end_point);
    }
    sample_run(body, paths, (t - lead) % cycle)
}

/// Sample a run of back-to-back segments at local time `t`.
fn sample_run(segments: &[Segment], paths: &PathRegistry, mut t: f32) -> Option<Point> {
    for segment in segments {
        let dur = segment.duration_ms();
        if t < dur {
            return segment.point_at(t / dur, paths);
        }
        t -= dur;
    }
    segments.last().and_then(Segment::end_point)
}

/// Positions at every segment boundary where the end of one segment does not
/// meet the start of the next, including the loop seam. Each entry is
/// `(segment index, gap)`.
pub fn discontinuities(chain: &Chain, tolerance: f32) -> Vec<(usize, f32)> {
    let segments = chain.segments();
    let mut gaps = Vec::new();
    let mut check = |index: usize, from: Option<Point>, to: Option<Point>| {
        if let (Some(a), Some(b)) = (from, to) {
            let gap = a.distance(b);
            if gap > tolerance {
                gaps.push((index, gap));
            }
        }
    };
    for (i, pair) in segments.windows(2).enumerate() {
        check(i + 1, pair[0].end_point(), pair[1].start_point());
    }
    if let (Some(anchor), Some(last)) = (chain.loop_index(), segments.last()) {
        if let Some(seg) = segments.get(anchor) {
            check(anchor, last.end_point(), seg.start_point());
        }
    }
    gaps
}
