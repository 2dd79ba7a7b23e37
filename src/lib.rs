//! Bubble Pop - tap the falling bubbles before they reach the bottom
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bubble lifecycle, spawning, difficulty, game loop)
//! - `surface`: Drawing interface the simulation talks to
//! - `scene`: Retained display list implementing that interface
//! - `renderer`: WebGPU rendering of the scene
//! - `hud`: Status bar chrome
//! - `config`: Data-driven game tuning

pub mod config;
pub mod error;
pub mod hud;
pub mod renderer;
pub mod scene;
pub mod sim;
pub mod surface;

pub use config::{DisplayConfig, GameConfig};
pub use error::ConfigError;
pub use hud::StatusBar;
pub use scene::Scene;
pub use surface::{Color, DisplaySurface, HandleId};

/// Frame pacing constants
pub mod consts {
    /// Reference frame duration the frame delta is scaled to (60 Hz)
    pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Upper bound on a single frame delta (a stalled tab must not teleport bubbles)
    pub const MAX_FRAME_DELTA: f32 = 6.0;
}

/// Convert elapsed milliseconds into a frame delta relative to 60 Hz
#[inline]
pub fn frame_delta(elapsed_ms: f64) -> f32 {
    ((elapsed_ms / consts::REFERENCE_FRAME_MS) as f32).clamp(0.0, consts::MAX_FRAME_DELTA)
}
