//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Seeded RNG only
//! - Wall-clock time is passed in, never read
//! - Stable iteration order (bubble registration order)
//! - Drawing goes through the `DisplaySurface` trait

pub mod bubble;
pub mod difficulty;
pub mod rng;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use bubble::{Bubble, BubbleId, BubbleState, Shrink};
pub use difficulty::{DifficultyConfig, DifficultyController, SpawnParams, SpawnRange};
pub use rng::{PALETTE, RandomSource};
pub use session::GameSession;
pub use spawn::{SpawnScheduler, SpawnStyle, spawn_bubble};
pub use state::{GameEvent, InputEvent, SessionState};
pub use tick::{Frame, tick};
pub use timer::{IntervalTimer, MAX_TIMER_CATCH_UP};
