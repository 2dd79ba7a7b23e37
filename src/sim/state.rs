//! Session state and the events that flow in and out of the simulation

use serde::{Deserialize, Serialize};

use super::bubble::BubbleId;
use super::difficulty::SpawnParams;

/// Score, lives and flags read by the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub lives: u32,
    pub paused: bool,
    pub game_over: bool,
    /// Seconds of unpaused play
    pub elapsed_seconds: u32,
    /// Ranges used for the next spawn
    pub spawn_params: SpawnParams,
    /// Score frozen at game over
    pub final_score: Option<u32>,
}

impl SessionState {
    pub fn new(lives: u32, spawn_params: SpawnParams) -> Self {
        Self {
            score: 0,
            lives,
            paused: false,
            game_over: false,
            elapsed_seconds: 0,
            spawn_params,
            final_score: None,
        }
    }

    /// Taps and spawns are only honoured while this holds
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.paused && !self.game_over
    }

    /// Drop one life, clamped at zero. Returns the remaining lives.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

/// Player input, queued between frames and applied at the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer-down / touch-start on a bubble
    Tap(BubbleId),
    /// Pause button or key
    TogglePause,
}

/// Things the host UI may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned { id: BubbleId },
    /// Tapped while active
    Popped { id: BubbleId, score: u32 },
    /// Fell off the bottom
    Escaped { id: BubbleId, lives: u32 },
    /// Shrink-out finished, display handle released
    Removed { id: BubbleId },
    DifficultyRaised { level: u32, params: SpawnParams },
    PauseChanged { paused: bool },
    GameOver { final_score: u32 },
}
