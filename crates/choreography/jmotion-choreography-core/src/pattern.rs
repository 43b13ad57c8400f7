//! Separated pattern tables: one throw cycle per prop.
//!
//! The notation parser that produces these tables lives outside this crate;
//! `validate` enforces the contract the choreography relies on.

use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// Heights below this floor never speed the animation up.
pub const MIN_SCALING_HEIGHT: u32 = 5;

/// Throw cycle of a single prop.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropPattern {
    /// Beat of the first throw.
    pub start: u32,
    /// Number of throws in one cycle.
    pub length: u32,
    /// Throw heights in beats; negative only in synchronous patterns.
    pub numbers: Vec<i32>,
    /// Beats elapsing before each throw is released; odd means the prop
    /// changes hands.
    pub times: Vec<u32>,
}

impl PropPattern {
    pub fn new(start: u32, numbers: Vec<i32>, times: Vec<u32>) -> Self {
        Self {
            start,
            length: numbers.len() as u32,
            numbers,
            times,
        }
    }

    /// Height of the throw preceding the first one (the cycle wraps around).
    pub fn wrap_height(&self) -> Option<i32> {
        self.numbers.last().copied()
    }

    fn validate(&self, prop: usize, synchronous: bool) -> Result<(), PatternError> {
        let expected = self.length as usize;
        if expected == 0 {
            return Err(PatternError::EmptyCycle { prop });
        }
        if self.numbers.len() != expected {
            return Err(PatternError::NumbersLength {
                prop,
                expected,
                found: self.numbers.len(),
            });
        }
        if self.times.len() != expected {
            return Err(PatternError::TimesLength {
                prop,
                expected,
                found: self.times.len(),
            });
        }
        for (position, &height) in self.numbers.iter().enumerate() {
            if height == 0 {
                return Err(PatternError::ZeroThrow { prop, position });
            }
            if height < 0 && !synchronous {
                return Err(PatternError::NegativeThrow {
                    prop,
                    position,
                    height,
                });
            }
        }
        if let Some(position) = self.times.iter().position(|&t| t < 1) {
            return Err(PatternError::ZeroTime { prop, position });
        }
        Ok(())
    }
}

/// A whole separated pattern.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pattern {
    #[serde(default)]
    pub synchronous: bool,
    pub props: Vec<PropPattern>,
}

impl Pattern {
    pub fn new(synchronous: bool, props: Vec<PropPattern>) -> Self {
        Self { synchronous, props }
    }

    pub fn from_json(json: &str) -> Result<Self, PatternError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every prop; the first violation wins.
    pub fn validate(&self) -> Result<(), PatternError> {
        self.props
            .iter()
            .enumerate()
            .try_for_each(|(i, prop)| prop.validate(i, self.synchronous))
    }

    /// Largest throw magnitude, ignoring holds (height 2) and floored at
    /// [`MIN_SCALING_HEIGHT`].
    pub fn max_height(&self) -> u32 {
        self.props
            .iter()
            .flat_map(|prop| prop.numbers.iter())
            .filter(|&&n| n != 2)
            .map(|n| n.unsigned_abs())
            .fold(MIN_SCALING_HEIGHT, u32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cascade() -> Pattern {
        Pattern::new(
            false,
            (0..3)
                .map(|start| PropPattern::new(start, vec![3, 3], vec![3, 3]))
                .collect(),
        )
    }

    #[test]
    fn valid_cascade() {
        assert_eq!(cascade().validate(), Ok(()));
        assert_eq!(cascade().max_height(), 5);
    }

    #[test]
    fn empty_pattern_is_valid() {
        assert_eq!(Pattern::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let mut pattern = cascade();
        pattern.props[1].length = 3;
        assert_eq!(
            pattern.validate(),
            Err(PatternError::NumbersLength {
                prop: 1,
                expected: 3,
                found: 2
            })
        );
        pattern.props[1].numbers.push(3);
        assert!(matches!(
            pattern.validate(),
            Err(PatternError::TimesLength { prop: 1, .. })
        ));
    }

    #[test]
    fn rejects_zero_and_negative_heights() {
        let mut pattern = cascade();
        pattern.props[0].numbers[1] = 0;
        assert_eq!(
            pattern.validate(),
            Err(PatternError::ZeroThrow {
                prop: 0,
                position: 1
            })
        );

        pattern.props[0].numbers[1] = -4;
        assert!(matches!(
            pattern.validate(),
            Err(PatternError::NegativeThrow { height: -4, .. })
        ));
        pattern.synchronous = true;
        assert_eq!(pattern.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_time_and_empty_cycle() {
        let mut pattern = cascade();
        pattern.props[2].times[0] = 0;
        assert_eq!(
            pattern.validate(),
            Err(PatternError::ZeroTime {
                prop: 2,
                position: 0
            })
        );
        let empty = Pattern::new(false, vec![PropPattern::new(0, vec![], vec![])]);
        assert_eq!(empty.validate(), Err(PatternError::EmptyCycle { prop: 0 }));
    }

    #[test]
    fn max_height_ignores_holds_and_sign() {
        let pattern = Pattern::new(
            true,
            vec![
                PropPattern::new(0, vec![2, -8], vec![2, 1]),
                PropPattern::new(1, vec![6], vec![6]),
            ],
        );
        assert_eq!(pattern.max_height(), 8);
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let ok = Pattern::from_json(
            r#"{"synchronous":false,"props":[{"start":0,"length":1,"numbers":[4],"times":[4]}]}"#,
        )
        .expect("parse");
        assert_eq!(ok.props[0].numbers, vec![4]);
        assert!(matches!(
            Pattern::from_json("{\"props\": 3}"),
            Err(PatternError::Json(_))
        ));
    }
}
