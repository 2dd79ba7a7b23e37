//! Bubble spawning on a fixed wall-clock cadence

use std::time::Duration;

use glam::Vec2;

use super::bubble::{Bubble, BubbleId};
use super::difficulty::{SpawnParams, SpawnRange};
use super::rng::RandomSource;
use super::state::SessionState;
use super::timer::IntervalTimer;
use crate::surface::{Color, DisplaySurface, Shape, ShapeStyle};

/// Fires once per spawn interval; cancelled for good at game over
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    timer: IntervalTimer,
}

impl SpawnScheduler {
    pub fn new(interval: Duration, now: Duration) -> Self {
        Self {
            timer: IntervalTimer::new(interval, now),
        }
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.timer.is_cancelled()
    }

    pub fn resync(&mut self, now: Duration) {
        self.timer.resync(now);
    }

    /// How many bubbles to create now. Firings while paused (or once no
    /// lives remain) are consumed without spawning.
    pub fn poll(&mut self, now: Duration, state: &SessionState) -> u32 {
        let fired = self.timer.poll(now);
        if fired == 0 || !state.is_running() || state.lives == 0 {
            return 0;
        }
        fired
    }
}

/// Options that do not change over a session
#[derive(Debug, Clone, Copy)]
pub struct SpawnStyle {
    pub colorful: bool,
    pub shadow: bool,
}

/// Draw a new bubble from the current ranges and register its display handle
pub fn spawn_bubble<S: DisplaySurface + ?Sized>(
    id: BubbleId,
    params: &SpawnParams,
    viewport: Vec2,
    style: SpawnStyle,
    rng: &mut RandomSource,
    surface: &mut S,
) -> Bubble {
    let fall_speed = rng.int_in(params.fall_speed);
    let radius = rng.int_in(params.radius).max(1);

    // Horizontal position keeps the centre at least half a radius inside
    let half = radius / 2;
    let max_x = (viewport.x as i32 - half).max(half);
    let x = rng.int_in(SpawnRange::new(half, max_x));
    let pos = Vec2::new(x as f32, -(radius as f32));

    let color = if style.colorful { rng.color() } else { Color::WHITE };

    let handle = surface.create_display_handle(
        Shape::Circle {
            radius: radius as f32,
        },
        pos,
        ShapeStyle {
            fill: color,
            shadow: style.shadow,
        },
    );

    log::debug!(
        "Spawned bubble {} at x={} r={} speed={}",
        id,
        x,
        radius,
        fall_speed
    );

    Bubble::new(id, handle, pos, radius as f32, fall_speed as f32, color)
}
