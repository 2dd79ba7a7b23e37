//! Rendering-and-input surface the simulation draws through
//!
//! The core never owns pixels. It asks the surface for display handles,
//! moves/scales them, and destroys them when an entity leaves the collection.
//! Every mutating call reports whether the handle still existed so the core
//! can treat vanished handles as an idempotent no-op.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque display handle issued by a surface
pub type HandleId = u32;

/// Packed 0xRRGGBB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// CSS hex string (`#rrggbb`) for DOM styling
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0 & 0xffffff)
    }

    /// Linear RGBA for sRGB render targets
    pub fn to_linear_rgba(self) -> [f32; 4] {
        let lin = |c: u8| (c as f32 / 255.0).powf(2.2);
        [lin(self.r()), lin(self.g()), lin(self.b()), 1.0]
    }
}

/// Geometry of a display handle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Circle centred on the handle position
    Circle { radius: f32 },
    /// Axis-aligned rectangle with its top-left corner at the handle position
    Rect { size: Vec2 },
}

/// Fill style for shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub fill: Color,
    /// Soft drop shadow under the shape
    pub shadow: bool,
}

impl ShapeStyle {
    pub const fn filled(fill: Color) -> Self {
        Self { fill, shadow: false }
    }
}

/// Text style for HUD labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub fill: Color,
    pub stroke: Color,
}

/// Drawing surface consumed by the simulation and HUD
pub trait DisplaySurface {
    /// Viewport size in logical pixels (width, height)
    fn viewport(&self) -> Vec2;

    fn create_display_handle(&mut self, shape: Shape, position: Vec2, style: ShapeStyle)
    -> HandleId;

    /// Returns false if the handle no longer exists
    fn update_handle_position(&mut self, handle: HandleId, position: Vec2) -> bool;

    /// Returns false if the handle no longer exists
    fn update_handle_scale(&mut self, handle: HandleId, sx: f32, sy: f32) -> bool;

    /// Release a handle. Returns false if it was already gone.
    fn destroy_handle(&mut self, handle: HandleId) -> bool;

    fn create_text_handle(&mut self, content: &str, style: TextStyle, position: Vec2) -> HandleId;

    /// Returns false if the handle no longer exists
    fn update_text_content(&mut self, handle: HandleId, content: &str) -> bool;
}
