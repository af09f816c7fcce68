//! Viewport transform between world space and screen space.

use crate::math::{Rect, Vec2};

/// The camera tracks a world-space focus point; everything is drawn
/// relative to it, with the focus point at the center of the output
/// surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec2,
}

impl Camera {
    /// Creates a camera focused on `position`.
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Current world-space focus point.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the focus point to `target`.
    pub fn center_on(&mut self, target: Vec2) {
        self.position = target;
    }

    /// Transforms a world-space rectangle into screen space for an output
    /// surface of the given `(width, height)`.
    pub fn to_screen(&self, rect: Rect, viewport: (f32, f32)) -> Rect {
        let offset = Vec2::new(
            viewport.0 / 2.0 - self.position.x(),
            viewport.1 / 2.0 - self.position.y(),
        );
        rect.translated(offset)
    }
}
