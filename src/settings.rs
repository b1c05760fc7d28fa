//! Game settings and tuning
//!
//! Every rate, speed and timer the simulation uses. Loaded from JSON; any
//! field left out falls back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SetupError;

/// How enemy spawn events are generated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum SpawnMode {
    /// Exactly one spawn every `interval` seconds of accumulated time
    FixedInterval { interval: f32 },
    /// Each tick spawns with probability `dt / mean_interval`
    Probability { mean_interval: f32 },
}

impl Default for SpawnMode {
    fn default() -> Self {
        SpawnMode::FixedInterval {
            interval: ENEMY_SPAWN_INTERVAL,
        }
    }
}

impl SpawnMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnMode::FixedInterval { .. } => "fixed_interval",
            SpawnMode::Probability { .. } => "probability",
        }
    }

    /// Mean time between spawns in either mode
    pub fn mean_interval(&self) -> f32 {
        match *self {
            SpawnMode::FixedInterval { interval } => interval,
            SpawnMode::Probability { mean_interval } => mean_interval,
        }
    }
}

/// Where spawned enemies are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPlacement {
    /// One of the level's named spawn points
    #[default]
    SpawnPoints,
    /// Anywhere in the world that is not inside an obstacle
    Random,
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Frame-rate cap; `None` runs uncapped
    pub max_fps: Option<u32>,

    // === Player ===
    pub player_speed: f32,
    /// Shrink applied to the player sprite rect to get its hitbox (width, height)
    pub player_hitbox_shrink: (f32, f32),
    pub player_animation_rate: f32,
    /// Enemy contact ends the run. Off turns enemies into harmless chasers.
    pub player_death: bool,

    // === Gun ===
    pub gun_cooldown: f32,
    pub volley_size: u32,
    /// Fire whenever the cooldown allows; otherwise wait for the fire input
    pub auto_fire: bool,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,

    // === Enemies ===
    pub enemy_speed: f32,
    pub enemy_hitbox_shrink: (f32, f32),
    pub enemy_animation_rate: f32,
    pub spawn_mode: SpawnMode,
    pub spawn_placement: SpawnPlacement,
    /// Hit flash duration for killed enemies
    pub impact_duration: f32,

    // === Determinism ===
    pub seed: u64,

    // === Audio ===
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub music: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: WINDOW_WIDTH,
            viewport_height: WINDOW_HEIGHT,
            max_fps: Some(60),

            player_speed: PLAYER_SPEED,
            player_hitbox_shrink: PLAYER_HITBOX_SHRINK,
            player_animation_rate: PLAYER_ANIMATION_RATE,
            player_death: true,

            gun_cooldown: GUN_COOLDOWN,
            volley_size: VOLLEY_SIZE,
            auto_fire: true,
            bullet_speed: BULLET_SPEED,
            bullet_lifetime: BULLET_LIFETIME,

            enemy_speed: ENEMY_SPEED,
            enemy_hitbox_shrink: ENEMY_HITBOX_SHRINK,
            enemy_animation_rate: ENEMY_ANIMATION_RATE,
            spawn_mode: SpawnMode::default(),
            spawn_placement: SpawnPlacement::default(),
            impact_duration: IMPACT_DURATION,

            seed: 0x5EED,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: MUSIC_VOLUME,
            music: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SetupError> {
        positive("viewport_width", self.viewport_width)?;
        positive("viewport_height", self.viewport_height)?;
        positive("player_speed", self.player_speed)?;
        non_negative("player_animation_rate", self.player_animation_rate)?;
        positive("gun_cooldown", self.gun_cooldown)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("bullet_lifetime", self.bullet_lifetime)?;
        positive("enemy_speed", self.enemy_speed)?;
        non_negative("enemy_animation_rate", self.enemy_animation_rate)?;
        non_negative("impact_duration", self.impact_duration)?;
        if self.volley_size == 0 {
            return Err(SetupError::InvalidSettings {
                field: "volley_size",
                reason: "a volley needs at least one direction".to_string(),
            });
        }
        match self.spawn_mode {
            SpawnMode::FixedInterval { interval } => positive("spawn_mode.interval", interval)?,
            SpawnMode::Probability { mean_interval } => {
                positive("spawn_mode.mean_interval", mean_interval)?
            }
        }
        if self.max_fps == Some(0) {
            return Err(SetupError::InvalidSettings {
                field: "max_fps",
                reason: "use null for an uncapped frame rate".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SetupError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidSettings {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SetupError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidSettings {
            field,
            reason: format!("must be zero or positive, got {value}"),
        })
    }
}
