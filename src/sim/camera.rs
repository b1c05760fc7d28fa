//! World-to-screen camera
//!
//! Only drawing goes through the camera. Movement and collision always work
//! in world coordinates.

use glam::Vec2;

use super::geom::Rect;

/// Follows the player, clamped so the viewport never leaves the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub viewport: Vec2,
    pub world: Vec2,
    offset: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2, world: Vec2) -> Self {
        Self {
            viewport,
            world,
            offset: Vec2::ZERO,
        }
    }

    /// Center the view on `target`, clamped to the world bounds.
    ///
    /// When the world is smaller than the viewport on an axis, that axis
    /// stays pinned at 0.
    pub fn update(&mut self, target: Vec2) {
        let half = self.viewport * 0.5;
        let min = -(self.world - self.viewport).max(Vec2::ZERO);
        self.offset = (half - target).clamp(min, Vec2::ZERO);
    }

    /// Translation added to world coordinates to get screen coordinates
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// `rect` in screen space
    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translated(self.offset)
    }
}
