//! Bubble entity and its lifecycle
//!
//! `Active` bubbles fall and accept taps. Once tapped or lost off the bottom
//! they become `Disabled` and shrink each tick until their scale drops below
//! zero, at which point the session removes them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::surface::{Color, HandleId};

pub type BubbleId = u32;

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Falling, tappable
    Active,
    /// Shrinking out, pending removal
    Disabled,
}

/// Result of one shrink step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shrink {
    /// Still visible at this scale
    Scaled(f32),
    /// Scale went negative; remove it
    Expired,
}

/// A falling bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    /// Display handle on the surface
    pub handle: HandleId,
    /// Pixels added to y per tick (plus the frame delta)
    pub fall_speed: f32,
    pub radius: f32,
    pub pos: Vec2,
    pub color: Color,
    pub state: BubbleState,
    /// Shrink factor, 1.0 until disabled
    pub scale: f32,
}

impl Bubble {
    pub fn new(id: BubbleId, handle: HandleId, pos: Vec2, radius: f32, fall_speed: f32, color: Color) -> Self {
        Self {
            id,
            handle,
            fall_speed,
            radius,
            pos,
            color,
            state: BubbleState::Active,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == BubbleState::Active
    }

    /// Rendered height
    #[inline]
    pub fn height(&self) -> f32 {
        self.radius * 2.0 * self.scale
    }

    /// Advance one tick of gravity. Disabled bubbles stay put.
    pub fn fall(&mut self, frame_delta: f32) {
        if self.is_active() {
            self.pos.y += self.fall_speed + frame_delta.max(0.0);
        }
    }

    /// Fully past the bottom edge of the viewport
    pub fn has_exited(&self, viewport_height: f32) -> bool {
        self.pos.y > viewport_height + self.height()
    }

    /// Active -> Disabled. Returns false if it was already disabled.
    pub fn disable(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = BubbleState::Disabled;
        self.scale = 1.0;
        true
    }

    /// Shrink a disabled bubble by `step`
    pub fn shrink(&mut self, step: f32) -> Shrink {
        debug_assert!(!self.is_active(), "only disabled bubbles shrink");
        self.scale -= step;
        if self.scale < 0.0 {
            Shrink::Expired
        } else {
            Shrink::Scaled(self.scale)
        }
    }
}
