//! Setup errors
//!
//! The simulation has no runtime failure modes. Everything that can go wrong
//! is a content or configuration defect and is reported before the first tick.

use glam::Vec2;
use thiserror::Error;

/// A defect found while building the simulation. Fatal: the loop never starts.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("level has no usable enemy spawn points")]
    NoSpawnPoints,

    #[error("sprite atlas registers no enemy types")]
    NoEnemyTypes,

    #[error("frame set `{0}` has no frames")]
    EmptyFrameSet(String),

    #[error("frame set `{set}` mixes frame sizes ({expected} vs {found})")]
    MismatchedFrameSize {
        set: String,
        expected: Vec2,
        found: Vec2,
    },

    #[error("{what} hitbox is degenerate ({width} x {height})")]
    DegenerateHitbox {
        what: &'static str,
        width: f32,
        height: f32,
    },

    #[error("level has no `Player` entity marker")]
    MissingPlayerStart,

    #[error("player start ({x}, {y}) lies inside an obstacle")]
    PlayerInsideObstacle { x: f32, y: f32 },

    #[error("world size must be positive, got {width} x {height}")]
    EmptyWorld { width: f32, height: f32 },

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSettings {
        field: &'static str,
        reason: String,
    },

    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
