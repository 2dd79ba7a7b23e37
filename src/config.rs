//! Game configuration
//!
//! Injected into [`GameSession`](crate::sim::GameSession) at construction.
//! Defaults reproduce the classic pacing; any subset can be overridden from
//! JSON (the browser host reads it from the canvas `data-config` attribute).

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::{DifficultyConfig, SpawnParams, SpawnRange};
use crate::surface::Color;

/// Visual settings for the display surface and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Playfield background
    pub background: Color,
    /// Status bar strip across the top
    pub status_bar_color: Color,
    pub status_bar_height: f32,
    /// HUD text
    pub text_font: String,
    pub text_size: f32,
    pub text_color: Color,
    pub text_stroke: Color,
    /// Soft drop shadow under bubbles
    pub shadows: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            background: Color(0x008e94),
            status_bar_color: Color(0x002a2c),
            status_bar_height: 50.0,
            text_font: "Candal".to_string(),
            text_size: 26.0,
            text_color: Color(0x008e94),
            text_stroke: Color(0x002526),
            shadows: true,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield size in logical pixels
    pub viewport: Vec2,
    pub initial_lives: u32,

    // === Timers (wall clock) ===
    pub spawn_interval_ms: u64,
    /// Period of the elapsed-seconds counter
    pub difficulty_interval_ms: u64,

    // === Spawning ===
    /// Initial fall-speed and radius ranges
    pub spawn: SpawnParams,
    /// Pick bubble colours from the palette (white otherwise)
    pub colorful: bool,

    // === Progression ===
    pub difficulty: DifficultyConfig,

    // === Lifecycle ===
    /// Scale lost per tick while a bubble shrinks out
    pub shrink_step: f32,

    pub display: DisplayConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(800.0, 600.0),
            initial_lives: 3,

            spawn_interval_ms: 1000,
            difficulty_interval_ms: 1000,

            spawn: SpawnParams {
                fall_speed: SpawnRange::new(0, 5),
                radius: SpawnRange::new(20, 70),
            },
            colorful: true,

            difficulty: DifficultyConfig::default(),

            shrink_step: 0.1,

            display: DisplayConfig::default(),
        }
    }
}

impl GameConfig {
    /// Default config sized to a viewport
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn difficulty_interval(&self) -> Duration {
        Duration::from_millis(self.difficulty_interval_ms)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport.x > 0.0 && self.viewport.y > 0.0) {
            return Err(ConfigError::EmptyViewport {
                width: self.viewport.x,
                height: self.viewport.y,
            });
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "spawn" });
        }
        if self.difficulty_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval { name: "difficulty" });
        }
        if self.difficulty.ratchet_every_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "difficulty ratchet",
            });
        }

        // The ratchet only ever makes the game harder
        let difficulty = &self.difficulty;
        for (name, step) in [
            ("fall speed", difficulty.fall_speed_step),
            ("radius", difficulty.radius_step),
        ] {
            if step < 0 {
                return Err(ConfigError::NegativeStep { name, step });
            }
        }
        if difficulty.radius_floor < 1 {
            return Err(ConfigError::RadiusFloorTooLow {
                floor: difficulty.radius_floor,
            });
        }

        let SpawnParams { fall_speed, radius } = self.spawn;
        for (name, range) in [("fall speed", fall_speed), ("radius", radius)] {
            if range.min > range.max {
                return Err(ConfigError::InvertedRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if fall_speed.min < 0 {
            return Err(ConfigError::NegativeFallSpeed { min: fall_speed.min });
        }
        if radius.min <= 0 {
            return Err(ConfigError::NonPositiveRadius { min: radius.min });
        }
        if !(self.shrink_step > 0.0) {
            return Err(ConfigError::NonPositiveShrinkStep(self.shrink_step));
        }
        Ok(())
    }
}
