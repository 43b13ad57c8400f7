//! Error types for pattern intake.

use thiserror::Error;

/// Reasons a separated pattern table is rejected before choreography starts.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PatternError {
    #[error("prop {prop}: cycle length must be positive")]
    EmptyCycle { prop: usize },

    #[error("prop {prop}: expected {expected} throw heights, found {found}")]
    NumbersLength {
        prop: usize,
        expected: usize,
        found: usize,
    },

    #[error("prop {prop}: expected {expected} throw times, found {found}")]
    TimesLength {
        prop: usize,
        expected: usize,
        found: usize,
    },

    #[error("prop {prop}: throw height at position {position} is zero")]
    ZeroThrow { prop: usize, position: usize },

    #[error("prop {prop}: negative throw height {height} at position {position} requires a synchronous pattern")]
    NegativeThrow {
        prop: usize,
        position: usize,
        height: i32,
    },

    #[error("prop {prop}: throw time at position {position} must be at least 1")]
    ZeroTime { prop: usize, position: usize },

    #[error("pattern json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for PatternError {
    fn from(err: serde_json::Error) -> Self {
        PatternError::Json(err.to_string())
    }
}
