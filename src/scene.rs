//! Retained display list
//!
//! Platform-independent [`DisplaySurface`] implementation. The WebGPU renderer
//! reads shapes from it, the browser host mirrors its text handles into DOM
//! nodes, and the native driver and tests use it directly.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::surface::{DisplaySurface, HandleId, Shape, ShapeStyle, TextStyle};

/// A shape handle
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub shape: Shape,
    pub position: Vec2,
    pub scale: Vec2,
    pub style: ShapeStyle,
}

impl Sprite {
    /// Whether a point lies inside the (scaled) shape
    pub fn contains(&self, point: Vec2) -> bool {
        if self.scale.x <= 0.0 || self.scale.y <= 0.0 {
            return false;
        }
        match self.shape {
            Shape::Circle { radius } => {
                // Ellipse test handles non-uniform scale
                let d = (point - self.position) / (self.scale * radius);
                d.length_squared() <= 1.0
            }
            Shape::Rect { size } => {
                let max = self.position + size * self.scale;
                point.cmpge(self.position).all() && point.cmple(max).all()
            }
        }
    }
}

/// A text handle
#[derive(Debug, Clone, PartialEq)]
pub struct TextSprite {
    pub content: String,
    pub position: Vec2,
    pub style: TextStyle,
}

/// Retained scene of shapes and text, keyed by handle
#[derive(Debug, Clone, Default)]
pub struct Scene {
    viewport: Vec2,
    next_handle: HandleId,
    sprites: BTreeMap<HandleId, Sprite>,
    texts: BTreeMap<HandleId, TextSprite>,
    /// Text handles changed since the last `take_text_updates`
    text_updates: Vec<HandleId>,
}

impl Scene {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            next_handle: 1,
            ..Default::default()
        }
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Shapes in draw order (oldest first)
    pub fn sprites(&self) -> impl Iterator<Item = (HandleId, &Sprite)> {
        self.sprites.iter().map(|(id, s)| (*id, s))
    }

    pub fn sprite(&self, handle: HandleId) -> Option<&Sprite> {
        self.sprites.get(&handle)
    }

    pub fn texts(&self) -> impl Iterator<Item = (HandleId, &TextSprite)> {
        self.texts.iter().map(|(id, t)| (*id, t))
    }

    pub fn text(&self, handle: HandleId) -> Option<&TextSprite> {
        self.texts.get(&handle)
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Topmost circle under a point
    pub fn hit_test(&self, point: Vec2) -> Option<HandleId> {
        self.sprites
            .iter()
            .rev()
            .filter(|(_, s)| matches!(s.shape, Shape::Circle { .. }))
            .find(|(_, s)| s.contains(point))
            .map(|(id, _)| *id)
    }

    /// Drain the list of text handles whose content changed
    pub fn take_text_updates(&mut self) -> Vec<HandleId> {
        std::mem::take(&mut self.text_updates)
    }

    fn allocate(&mut self) -> HandleId {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }
}

impl DisplaySurface for Scene {
    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn create_display_handle(
        &mut self,
        shape: Shape,
        position: Vec2,
        style: ShapeStyle,
    ) -> HandleId {
        let id = self.allocate();
        self.sprites.insert(
            id,
            Sprite {
                shape,
                position,
                scale: Vec2::ONE,
                style,
            },
        );
        id
    }

    fn update_handle_position(&mut self, handle: HandleId, position: Vec2) -> bool {
        match self.sprites.get_mut(&handle) {
            Some(sprite) => {
                sprite.position = position;
                true
            }
            None => false,
        }
    }

    fn update_handle_scale(&mut self, handle: HandleId, sx: f32, sy: f32) -> bool {
        match self.sprites.get_mut(&handle) {
            Some(sprite) => {
                sprite.scale = Vec2::new(sx, sy);
                true
            }
            None => false,
        }
    }

    fn destroy_handle(&mut self, handle: HandleId) -> bool {
        self.sprites.remove(&handle).is_some() || self.texts.remove(&handle).is_some()
    }

    fn create_text_handle(&mut self, content: &str, style: TextStyle, position: Vec2) -> HandleId {
        let id = self.allocate();
        self.texts.insert(
            id,
            TextSprite {
                content: content.to_string(),
                position,
                style,
            },
        );
        self.text_updates.push(id);
        id
    }

    fn update_text_content(&mut self, handle: HandleId, content: &str) -> bool {
        let Some(text) = self.texts.get_mut(&handle) else {
            return false;
        };
        if text.content != content {
            text.content = content.to_string();
            if !self.text_updates.contains(&handle) {
                self.text_updates.push(handle);
            }
        }
        true
    }
}
