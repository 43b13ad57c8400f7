//! Prop choreographer.
//!
//! Walks one prop's throw cycle and emits its chain: hold-path segments while
//! the prop rests in a hand, parabolic segments while it flies. The walk keeps
//! four pieces of state:
//!
//! - `forward`/`opposite`: hold windows of the hand holding the prop and of
//!   the other hand; swapped on every crossing throw.
//! - `lag`: phase of the holding hand (0 or 1). Flips on a crossing throw in
//!   asynchronous patterns, where the hands alternate beats.
//! - `time`: beat counter, advanced by every thrown (non-2) height.
//! - `index`: current window, `(time - lag) % windows`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::arc::EasedArc;
use crate::chain::Chain;
use crate::config::ChoreographyConfig;
use crate::geometry::{Point, Side};
use crate::ids::PathId;
use crate::orbit::HoldPaths;
use crate::path::{HoldPath, KeyRange};
use crate::pattern::PropPattern;
use crate::segment::Segment;

/// Hand state at the moment one throw of the cycle is released.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThrowRecord {
    pub position: usize,
    pub height: i32,
    /// Hand releasing the throw.
    pub hand: Side,
    /// Hold window the prop leaves from.
    pub window: usize,
    /// Phase of `hand` when releasing.
    pub lag: u8,
    /// Whether the prop lands in the other hand.
    pub crossed: bool,
}

/// Choreography of one prop.
#[derive(Clone, Debug)]
pub struct PropChain {
    pub chain: Chain,
    pub loop_index: usize,
    pub referenced_paths: BTreeSet<PathId>,
    pub throws: Vec<ThrowRecord>,
}

impl PropChain {
    /// Hand holding the prop when its first throw is released.
    pub fn initial_hand(&self) -> Option<Side> {
        self.throws.first().map(|t| t.hand)
    }
}

pub struct PropChoreographer<'a> {
    timing: &'a ChoreographyConfig,
    holds: &'a HoldPaths,
    name_prefix: &'a str,
}

impl<'a> PropChoreographer<'a> {
    pub fn new(timing: &'a ChoreographyConfig, holds: &'a HoldPaths, name_prefix: &'a str) -> Self {
        Self {
            timing,
            holds,
            name_prefix,
        }
    }

    fn chain_name(&self, index: usize) -> String {
        if self.name_prefix.is_empty() {
            format!("prop_{index}")
        } else {
            format!("{}_prop_{index}", self.name_prefix)
        }
    }

    /// Build the chain of prop number `index`.
    pub fn choreograph(&self, prop: &PropPattern, index: usize) -> PropChain {
        let unit = self.timing.unit_ms;
        let half = self.timing.half_ms();
        let synchronous = self.timing.synchronous;

        let mut forward: &[HoldPath] = &self.holds.right;
        let mut opposite: &[HoldPath] = &self.holds.left;
        let windows = forward.len().min(opposite.len());
        let mut chain = Chain::new(self.chain_name(index));
        if windows == 0 {
            log::warn!("prop {index}: no hold windows, chain left empty");
            return PropChain {
                chain,
                loop_index: 0,
                referenced_paths: BTreeSet::new(),
                throws: Vec::new(),
            };
        }

        // Odd start: the prop begins in the other hand, half a cycle late.
        let start = prop.start as usize;
        let mut lag = start % 2;
        let mut delayed = false;
        if lag == 1 {
            std::mem::swap(&mut forward, &mut opposite);
            delayed = !synchronous;
        }

        let mut segments = Vec::new();

        // Idle in hand until the first throw.
        for i in 0..start - lag {
            segments.push(Segment::hold(&forward[i % windows], KeyRange::Full, unit));
        }

        let mut time = start;
        let mut window = (time - lag) % windows;

        // The wrapped-around throw was a pass: finish its catch first.
        let mut prev = prop.wrap_height().unwrap_or(0);
        if prev == 1 {
            segments.push(Segment::hold(&forward[window], KeyRange::FirstHalf, half));
        }
        let mut loop_index = segments.len();

        let mut throws = Vec::with_capacity(prop.numbers.len());
        for (position, &number) in prop.numbers.iter().enumerate() {
            let hold = &forward[window];

            // Catch to throw.
            let (range, duration) = if number == 1 {
                (KeyRange::FirstHalf, half)
            } else if prev == 1 {
                (KeyRange::SecondHalf, half)
            } else {
                (KeyRange::Full, unit)
            };
            let (_, launch) = hold.endpoints(range);
            if number != 1 || prev != 1 {
                segments.push(Segment::hold(hold, range, duration));
            }

            let mut record = ThrowRecord {
                position,
                height: number,
                hand: hold.side,
                window,
                lag: lag as u8,
                crossed: false,
            };

            // Throw to catch.
            if number == 2 {
                let next = &forward[(window + 1) % windows];
                segments.push(Segment::hold(next, KeyRange::Full, unit));
            } else {
                if prop.times.get(position).is_some_and(|t| t % 2 == 1) {
                    std::mem::swap(&mut forward, &mut opposite);
                    if !synchronous {
                        lag = 1 - lag;
                    }
                    record.crossed = true;
                }
                time += number.unsigned_abs() as usize;
                window = time.saturating_sub(lag) % windows;

                let target = &forward[window];
                let catch = if number == 1 {
                    target.middle()
                } else {
                    target.first()
                };
                let air = ChoreographyConfig::air_units(number);
                let height = self.timing.flight_height(air);
                let apex = Point::new((launch.x + catch.x) / 2.0, launch.y - height);
                log::trace!(
                    "prop {index}: throw {number} {} -> {} window {window}, air {air}, apex {height}",
                    record.hand.as_str(),
                    target.side.as_str()
                );
                segments.push(Segment::parabolic(
                    EasedArc::parabola(launch, apex, catch),
                    self.timing.flight_ms(air),
                ));
            }

            throws.push(record);
            prev = number;
        }

        if delayed {
            let pin = segments
                .first()
                .and_then(Segment::start_point)
                .unwrap_or_else(|| forward[0].first());
            segments.insert(0, Segment::halt(pin, unit));
            loop_index += 1;
        }

        for segment in segments {
            chain.add_segment(segment);
        }
        chain.finalize(loop_index);
        let loop_index = chain.loop_index().unwrap_or(0);
        let referenced_paths = chain.referenced_paths();

        log::debug!(
            "prop {index}: {} segments, loop at {loop_index}, {} paths",
            chain.len(),
            referenced_paths.len()
        );

        PropChain {
            chain,
            loop_index,
            referenced_paths,
            throws,
        }
    }
}
