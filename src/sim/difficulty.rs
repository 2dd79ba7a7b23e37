//! Difficulty progression
//!
//! A one-way ratchet driven by elapsed play time: bubbles fall faster and
//! shrink as the session goes on. Only a full restart resets it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, SessionState};
use super::timer::IntervalTimer;

/// Inclusive integer range used for spawn draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: i32,
    pub max: i32,
}

impl SpawnRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Shift both bounds by `delta`
    pub fn shifted(self, delta: i32) -> Self {
        Self::new(self.min.saturating_add(delta), self.max.saturating_add(delta)).clamped()
    }

    /// Lower both bounds by `step`, never below `floor`.
    /// A bound already at or below the floor stays where it is.
    pub fn lowered_to_floor(self, step: i32, floor: i32) -> Self {
        let lower = |bound: i32| {
            if bound <= floor {
                bound
            } else {
                bound.saturating_sub(step).max(floor)
            }
        };
        Self::new(lower(self.min), lower(self.max)).clamped()
    }

    /// Collapse an inverted range onto its upper bound
    pub fn clamped(self) -> Self {
        Self::new(self.min.min(self.max), self.max)
    }

    #[cfg(test)]
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Current spawn parameters, tightened by the ratchet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    pub fall_speed: SpawnRange,
    pub radius: SpawnRange,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            fall_speed: SpawnRange::new(0, 5),
            radius: SpawnRange::new(20, 70),
        }
    }
}

/// Ratchet tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Tighten every N elapsed seconds
    pub ratchet_every_secs: u32,
    /// Added to both fall-speed bounds
    pub fall_speed_step: i32,
    /// Subtracted from both radius bounds
    pub radius_step: i32,
    /// Radius bounds never drop below this
    pub radius_floor: i32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            ratchet_every_secs: 10,
            fall_speed_step: 1,
            radius_step: 5,
            radius_floor: 5,
        }
    }
}

impl DifficultyConfig {
    /// Apply one ratchet step
    pub fn tighten(&self, params: SpawnParams) -> SpawnParams {
        SpawnParams {
            fall_speed: params.fall_speed.shifted(self.fall_speed_step),
            radius: params
                .radius
                .lowered_to_floor(self.radius_step, self.radius_floor),
        }
    }
}

/// Counts active seconds and tightens spawn parameters on schedule
#[derive(Debug, Clone)]
pub struct DifficultyController {
    config: DifficultyConfig,
    timer: IntervalTimer,
    level: u32,
}

impl DifficultyController {
    pub fn new(config: DifficultyConfig, interval: Duration, now: Duration) -> Self {
        Self {
            config,
            timer: IntervalTimer::new(interval, now),
            level: 0,
        }
    }

    /// Number of ratchet steps applied so far
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn resync(&mut self, now: Duration) {
        self.timer.resync(now);
    }

    /// Fire any due seconds against the session state
    pub fn poll(&mut self, now: Duration, state: &mut SessionState, events: &mut Vec<GameEvent>) {
        for _ in 0..self.timer.poll(now) {
            self.on_second(state, events);
        }
    }

    /// One tick of the seconds counter; no-op while paused or after game over
    pub fn on_second(&mut self, state: &mut SessionState, events: &mut Vec<GameEvent>) {
        if state.paused || state.game_over {
            return;
        }

        state.elapsed_seconds += 1;
        // A zero period never ratchets
        if state.elapsed_seconds.checked_rem(self.config.ratchet_every_secs) != Some(0) {
            return;
        }

        state.spawn_params = self.config.tighten(state.spawn_params);
        self.level += 1;
        log::info!(
            "Difficulty {} at {}s: fall speed {:?}, radius {:?}",
            self.level,
            state.elapsed_seconds,
            state.spawn_params.fall_speed,
            state.spawn_params.radius
        );
        events.push(GameEvent::DifficultyRaised {
            level: self.level,
            params: state.spawn_params,
        });
    }
}
