//! Timed creation of projectiles and enemies
//!
//! `Gun` is a countdown gate in front of the radial volley. `EnemySpawner`
//! turns elapsed time into spawn events (fixed interval or per-tick
//! probability) and picks what and where to spawn.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::collision::overlaps_any;
use super::geom::Rect;
use super::sprites::EnemyType;
use crate::consts::RANDOM_PLACEMENT_ATTEMPTS;
use crate::radial_directions;
use crate::settings::{SpawnMode, SpawnPlacement};

/// Cooldown-gated radial gun
#[derive(Debug, Clone, PartialEq)]
pub struct Gun {
    /// Seconds between volleys
    pub cooldown: f32,
    /// Seconds left before the next volley may fire
    remaining: f32,
}

impl Gun {
    /// A gun that may fire immediately
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown,
            remaining: 0.0,
        }
    }

    /// Count down by elapsed time
    pub fn update(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Fire a volley of `count` evenly spaced unit directions if ready.
    ///
    /// Restarts the cooldown on success; returns `None` while cooling down.
    pub fn fire(&mut self, count: u32) -> Option<Vec<Vec2>> {
        if !self.ready() {
            return None;
        }
        self.remaining = self.cooldown;
        Some(radial_directions(count))
    }
}

/// Produces enemy spawn events and placements
#[derive(Debug, Clone)]
pub struct EnemySpawner {
    pub mode: SpawnMode,
    pub placement: SpawnPlacement,
    /// Valid spawn centers (obstacle-free), used with `SpawnPlacement::SpawnPoints`
    spawn_points: Vec<Vec2>,
    /// Time accumulated toward the next fixed-interval spawn
    accumulator: f32,
    enemy_types: u16,
}

impl EnemySpawner {
    pub fn new(
        mode: SpawnMode,
        placement: SpawnPlacement,
        spawn_points: Vec<Vec2>,
        enemy_types: u16,
    ) -> Self {
        Self {
            mode,
            placement,
            spawn_points,
            accumulator: 0.0,
            enemy_types,
        }
    }

    pub fn spawn_points(&self) -> &[Vec2] {
        &self.spawn_points
    }

    /// Number of spawn events produced by `dt` more seconds.
    ///
    /// Fixed interval: one event per whole interval of accumulated time, so
    /// a total duration `D` yields `floor(D / I)` events. Probability: at most
    /// one event, with chance `dt / mean_interval`.
    pub fn update(&mut self, dt: f32, rng: &mut Pcg32) -> u32 {
        match self.mode {
            SpawnMode::FixedInterval { interval } => {
                self.accumulator += dt;
                let mut count = 0;
                while self.accumulator >= interval {
                    self.accumulator -= interval;
                    count += 1;
                }
                count
            }
            SpawnMode::Probability { mean_interval } => {
                let chance = (dt / mean_interval).clamp(0.0, 1.0);
                u32::from(rng.random::<f32>() < chance)
            }
        }
    }

    /// Uniform pick from the enemy type pool
    pub fn choose_type(&self, rng: &mut Pcg32) -> EnemyType {
        EnemyType(rng.random_range(0..self.enemy_types.max(1)))
    }

    /// Where the next enemy goes, or `None` when no free spot was found.
    ///
    /// `size` is the enemy hitbox size; random placement rejects spots whose
    /// hitbox would overlap an obstacle, touch `keep_clear` or stick out of
    /// the world. Spawn points ignore `keep_clear`.
    pub fn choose_position(
        &self,
        rng: &mut Pcg32,
        world: Vec2,
        size: Vec2,
        obstacles: &[Rect],
        keep_clear: &Rect,
    ) -> Option<Vec2> {
        match self.placement {
            SpawnPlacement::SpawnPoints => self.spawn_points.choose(rng).copied(),
            SpawnPlacement::Random => {
                let half = size * 0.5;
                if world.x <= size.x || world.y <= size.y {
                    return None;
                }
                for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
                    let center = Vec2::new(
                        rng.random_range(half.x..world.x - half.x),
                        rng.random_range(half.y..world.y - half.y),
                    );
                    let hitbox = Rect::from_center(center, size);
                    if !hitbox.intersects(keep_clear) && !overlaps_any(&hitbox, obstacles) {
                        return Some(center);
                    }
                }
                None
            }
        }
    }
}
