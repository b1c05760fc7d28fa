//! Survivor - A top-down survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawning, game state)
//! - `renderer`: Camera-space draw list for the host renderer
//! - `platform`: Input sampling and frame pacing seams
//! - `audio`: Sound effect mixing for simulation events
//! - `app`: The frame loop (`run`)

pub mod app;
pub mod audio;
pub mod error;
pub mod level;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{RunSummary, TerminationCause, run};
pub use error::SetupError;
pub use level::Level;
pub use settings::{Settings, SpawnMode, SpawnPlacement};

use glam::{IVec2, Vec2};

/// Game configuration constants (defaults for `Settings`)
pub mod consts {
    /// Viewport dimensions in world units
    pub const WINDOW_WIDTH: f32 = 1280.0;
    pub const WINDOW_HEIGHT: f32 = 720.0;
    /// Edge length of one ground tile
    pub const TILE_SIZE: f32 = 64.0;

    /// Player movement speed (units/s)
    pub const PLAYER_SPEED: f32 = 500.0;
    /// Amount the player hitbox is shrunk from the sprite rect (width, height)
    pub const PLAYER_HITBOX_SHRINK: (f32, f32) = (60.0, 90.0);
    /// Player walk cycle rate (frames/s)
    pub const PLAYER_ANIMATION_RATE: f32 = 5.0;

    /// Enemy movement speed (units/s)
    pub const ENEMY_SPEED: f32 = 200.0;
    pub const ENEMY_HITBOX_SHRINK: (f32, f32) = (20.0, 40.0);
    pub const ENEMY_ANIMATION_RATE: f32 = 6.0;
    /// Fixed interval between enemy spawns (seconds)
    pub const ENEMY_SPAWN_INTERVAL: f32 = 0.3;
    /// Attempts made to find a free random position before a spawn is skipped
    pub const RANDOM_PLACEMENT_ATTEMPTS: u32 = 16;
    /// Distance from the player's center inside which random spawns are rejected
    pub const RANDOM_SPAWN_CLEARANCE: f32 = 320.0;

    /// Gun cooldown between volleys (seconds)
    pub const GUN_COOLDOWN: f32 = 0.5;
    /// Projectiles per volley
    pub const VOLLEY_SIZE: u32 = 8;
    pub const BULLET_SPEED: f32 = 1200.0;
    /// Bullet time-to-live (seconds)
    pub const BULLET_LIFETIME: f32 = 1.0;

    /// How long the hit flash of a killed enemy stays on screen (seconds)
    pub const IMPACT_DURATION: f32 = 0.4;

    /// Largest delta a single frame may feed the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;
    /// Most positions a projectile's step is checked at for hits
    pub const MAX_SWEEP_SAMPLES: u32 = 64;

    pub const SHOOT_VOLUME: f32 = 0.2;
    pub const MUSIC_VOLUME: f32 = 0.5;
}

/// Build a direction vector from held movement keys.
///
/// Each axis is `positive - negative`, so opposing keys cancel out. Screen
/// coordinates: +x is right, +y is down.
#[inline]
pub fn axis_input(left: bool, right: bool, up: bool, down: bool) -> IVec2 {
    IVec2::new(right as i32 - left as i32, down as i32 - up as i32)
}

/// Unit direction vectors evenly spaced around the circle, starting at +x.
///
/// With `count = 8` this is the classic E, SE, S, SW, W, NW, N, NE volley
/// (y grows downward).
pub fn radial_directions(count: u32) -> Vec<Vec2> {
    let step = std::f32::consts::TAU / count.max(1) as f32;
    (0..count)
        .map(|i| Vec2::from_angle(step * i as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_axis_input_cancels_opposites() {
        assert_eq!(axis_input(true, true, false, false), IVec2::ZERO);
        assert_eq!(axis_input(false, true, true, false), IVec2::new(1, -1));
        assert_eq!(axis_input(true, false, false, true), IVec2::new(-1, 1));
    }

    #[test]
    fn test_radial_directions_eight_way() {
        let dirs = radial_directions(8);
        assert_eq!(dirs.len(), 8);
        // First is due east, third is due "down" (south in screen space)
        assert!((dirs[0] - Vec2::X).length() < 1e-6);
        assert!((dirs[2] - Vec2::Y).length() < 1e-6);
        let diag = Vec2::new(1.0, 1.0).normalize();
        assert!((dirs[1] - diag).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_radial_directions_unit_and_even(count in 1u32..64) {
            let dirs = radial_directions(count);
            prop_assert_eq!(dirs.len(), count as usize);
            let step = std::f32::consts::TAU / count as f32;
            for (i, d) in dirs.iter().enumerate() {
                prop_assert!((d.length() - 1.0).abs() < 1e-5);
                let next = dirs[(i + 1) % dirs.len()];
                // Angle between neighbours is always one step
                let angle = d.angle_to(next).rem_euclid(std::f32::consts::TAU);
                let expected = if count == 1 { 0.0 } else { step };
                prop_assert!((angle - expected).abs() < 1e-4);
            }
        }
    }
}
