//! Walk-cycle animation state

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which directional frame set is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    Up,
    #[default]
    Down,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Left, Facing::Right, Facing::Up, Facing::Down];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
            Facing::Up => "up",
            Facing::Down => "down",
        }
    }

    /// Facing for a movement direction. Horizontal wins when both axes move;
    /// a zero vector keeps `current`.
    pub fn from_direction(direction: Vec2, current: Facing) -> Facing {
        if direction.x > 0.0 {
            Facing::Right
        } else if direction.x < 0.0 {
            Facing::Left
        } else if direction.y > 0.0 {
            Facing::Down
        } else if direction.y < 0.0 {
            Facing::Up
        } else {
            current
        }
    }
}

/// Current animation variant, frame and accumulated time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameState {
    pub facing: Facing,
    pub index: usize,
    /// Seconds spent in the current walk cycle
    pub elapsed: f32,
}

impl FrameState {
    /// Advance the walk cycle while moving; snap to the idle pose (frame 0)
    /// when stopped.
    pub fn animate(&mut self, dt: f32, moving: bool, rate: f32) {
        if moving {
            self.elapsed += dt;
            self.index = (self.elapsed * rate) as usize;
        } else {
            self.elapsed = 0.0;
            self.index = 0;
        }
    }

    /// Update facing from `direction`, then animate
    pub fn animate_facing(&mut self, direction: Vec2, dt: f32, rate: f32) {
        self.facing = Facing::from_direction(direction, self.facing);
        self.animate(dt, direction != Vec2::ZERO, rate);
    }
}
