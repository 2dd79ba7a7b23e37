//! Configuration errors
//!
//! Gameplay itself has no failure modes: taps or removals that reference a
//! vanished bubble are silent no-ops, and game over is a state, not an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{name} range is inverted ({min} > {max})")]
    InvertedRange {
        name: &'static str,
        min: i32,
        max: i32,
    },

    #[error("fall speed must not be negative (min = {min})")]
    NegativeFallSpeed { min: i32 },

    #[error("radius must be positive (min = {min})")]
    NonPositiveRadius { min: i32 },

    #[error("{name} interval must be non-zero")]
    ZeroInterval { name: &'static str },

    #[error("viewport must be non-empty ({width}x{height})")]
    EmptyViewport { width: f32, height: f32 },

    #[error("initial lives must be at least 1")]
    NoLives,

    #[error("difficulty {name} step must not be negative (got {step})")]
    NegativeStep { name: &'static str, step: i32 },

    #[error("radius floor must be at least 1 (got {floor})")]
    RadiusFloorTooLow { floor: i32 },

    #[error("shrink step must be positive (got {0})")]
    NonPositiveShrinkStep(f32),
}
