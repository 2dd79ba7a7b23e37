//! Per-frame simulation tick
//!
//! Order within a frame:
//! 1. Drain queued input (taps, pause toggles)
//! 2. Game-over check
//! 3. Wall-clock timers (spawn, difficulty)
//! 4. Frozen while paused; otherwise advance every bubble in registration order
//! 5. Game-over check again so the last lost life ends the game this frame

use std::time::Duration;

use super::bubble::{BubbleState, Shrink};
use super::session::GameSession;
use super::state::GameEvent;
use crate::surface::DisplaySurface;

/// Timing for one rendered frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Frame {
    /// Monotonic wall-clock time
    pub now: Duration,
    /// Frame time scaled to the 60 Hz baseline (1.0 = one reference frame)
    pub delta: f32,
}

impl Frame {
    pub fn new(now: Duration, delta: f32) -> Self {
        Self { now, delta }
    }
}

/// Advance the session by one frame
pub fn tick<S: DisplaySurface + ?Sized>(session: &mut GameSession, surface: &mut S, frame: &Frame) {
    while let Some(input) = session.inputs.pop_front() {
        session.apply_input(input);
    }

    check_game_over(session);

    run_timers(session, surface, frame.now);

    if session.state.paused {
        return;
    }

    advance_bubbles(session, surface, frame.delta);

    check_game_over(session);
}

fn check_game_over(session: &mut GameSession) {
    if session.state.lives == 0 {
        session.end_game();
    }
}

fn run_timers<S: DisplaySurface + ?Sized>(session: &mut GameSession, surface: &mut S, now: Duration) {
    let spawns = session.spawner.poll(now, &session.state);
    for _ in 0..spawns {
        session.spawn(surface);
    }

    session
        .difficulty
        .poll(now, &mut session.state, &mut session.events);
}

fn advance_bubbles<S: DisplaySurface + ?Sized>(session: &mut GameSession, surface: &mut S, delta: f32) {
    let GameSession {
        config,
        state,
        bubbles,
        events,
        ..
    } = session;
    let floor = config.viewport.y;
    let shrink_step = config.shrink_step;

    bubbles.retain_mut(|bubble| match bubble.state {
        BubbleState::Active => {
            bubble.fall(delta);
            if !surface.update_handle_position(bubble.handle, bubble.pos) {
                log::trace!("Bubble {} has no display handle", bubble.id);
            }
            if bubble.has_exited(floor) {
                bubble.disable();
                let lives = state.lose_life();
                log::debug!("Bubble {} escaped, {} lives left", bubble.id, lives);
                events.push(GameEvent::Escaped {
                    id: bubble.id,
                    lives,
                });
            }
            true
        }
        BubbleState::Disabled => match bubble.shrink(shrink_step) {
            Shrink::Scaled(scale) => {
                surface.update_handle_scale(bubble.handle, scale, scale);
                true
            }
            Shrink::Expired => {
                if !surface.destroy_handle(bubble.handle) {
                    log::trace!("Handle for bubble {} already released", bubble.id);
                }
                events.push(GameEvent::Removed { id: bubble.id });
                false
            }
        },
    });
}
