//! Simulation state and setup
//!
//! `SimulationState` is built once from settings, level and sprite atlas,
//! then advanced by `tick`. Every content defect is caught here, before the
//! first tick runs.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::animation::Facing;
use super::camera::Camera;
use super::collision::{overlaps_any, rects_collide_precise};
use super::entity::{Entity, EntityId, EntityKind};
use super::geom::Rect;
use super::registry::{Group, Registry};
use super::spawner::{EnemySpawner, Gun};
use super::sprites::{EnemyType, Frame, SpriteAtlas};
use crate::consts::RANDOM_SPAWN_CLEARANCE;
use crate::error::SetupError;
use crate::level::Level;
use crate::settings::{Settings, SpawnPlacement};

/// Top-level state machine. `Terminated` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    Terminated,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    /// An enemy reached the player
    PlayerCaught,
    /// The host asked to quit
    Quit,
}

/// Things that happened during a tick, for audio and other host-side effects
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A volley of `count` projectiles left `origin`
    Shot { origin: Vec2, count: u32 },
    EnemySpawned { id: EntityId, kind: EnemyType, pos: Vec2 },
    /// A projectile hit one or more enemies at `pos`
    Impact { pos: Vec2 },
    EnemyKilled { id: EntityId, kind: EnemyType, pos: Vec2 },
    PlayerCaught { by: EntityId },
    GameOver { cause: TerminationCause },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub settings: Settings,
    pub atlas: SpriteAtlas,
    pub registry: Registry,
    /// The player's registry handle. The player is never destroyed.
    pub player: EntityId,
    /// Obstacle rects, fixed at setup (obstacles are never destroyed)
    pub obstacles: Vec<Rect>,
    pub camera: Camera,
    pub spawner: EnemySpawner,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub cause: Option<TerminationCause>,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Simulated seconds
    pub time: f32,
    pub ticks: u64,
    pub kills: u32,
    world: Vec2,
}

impl SimulationState {
    /// Build the world from level data. Fails fast on any content defect.
    pub fn new(settings: Settings, level: &Level, atlas: SpriteAtlas) -> Result<Self, SetupError> {
        settings.validate()?;

        let world = level.world_size();
        if world.x <= 0.0 || world.y <= 0.0 {
            return Err(SetupError::EmptyWorld {
                width: world.x,
                height: world.y,
            });
        }

        let mut registry = Registry::new();

        // Ground first so it gets the lowest ids
        let ts = level.tile_size;
        for tile in &level.ground {
            let rect = Rect::new(tile.x as f32 * ts, tile.y as f32 * ts, ts, ts);
            registry.insert(Entity::ground(rect, tile.image), &[Group::Render]);
        }

        let mut obstacles = Vec::with_capacity(level.objects.len());
        for object in &level.objects {
            let rect = object.rect();
            let groups: &[Group] = if object.image.is_some() {
                &[Group::Render, Group::Obstacles]
            } else {
                &[Group::Obstacles]
            };
            registry.insert(Entity::obstacle(rect, object.image), groups);
            obstacles.push(rect);
        }

        // Player
        let start = level.player_start()?;
        let player_size = atlas.player(Facing::Down).frame(0).size;
        let player_entity = Entity::player(
            start,
            player_size,
            settings.player_hitbox_shrink,
            settings.player_speed,
            Gun::new(settings.gun_cooldown),
        );
        check_hitbox("player", &player_entity.hitbox)?;
        if overlaps_any(&player_entity.hitbox, &obstacles) {
            return Err(SetupError::PlayerInsideObstacle {
                x: start.x,
                y: start.y,
            });
        }
        let player = registry.insert(player_entity, &[Group::Render]);

        // Enemy hitboxes must be usable, and spawn points must fit the largest one
        let mut largest = Vec2::ZERO;
        for i in 0..atlas.enemy_type_count() {
            let kind = EnemyType(i as u16);
            let hitbox = enemy_hitbox_size(&atlas, &settings, kind);
            check_hitbox("enemy", &Rect::from_center(Vec2::ZERO, hitbox))?;
            largest = largest.max(hitbox);
        }
        let spawn_points: Vec<Vec2> = level
            .spawn_points()
            .into_iter()
            .filter(|&p| {
                let blocked = overlaps_any(&Rect::from_center(p, largest), &obstacles);
                if blocked {
                    log::warn!("Dropping spawn point ({}, {}): inside an obstacle", p.x, p.y);
                }
                !blocked
            })
            .collect();
        if settings.spawn_placement == SpawnPlacement::SpawnPoints && spawn_points.is_empty() {
            return Err(SetupError::NoSpawnPoints);
        }

        let spawner = EnemySpawner::new(
            settings.spawn_mode,
            settings.spawn_placement,
            spawn_points,
            atlas.enemy_type_count() as u16,
        );

        let mut camera = Camera::new(
            Vec2::new(settings.viewport_width, settings.viewport_height),
            world,
        );
        camera.update(start);

        log::info!(
            "World ready: {}x{} units, {} obstacles, {} spawn points, {} enemy types",
            world.x,
            world.y,
            obstacles.len(),
            spawner.spawn_points().len(),
            atlas.enemy_type_count()
        );

        Ok(Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            atlas,
            registry,
            player,
            obstacles,
            camera,
            spawner,
            phase: GamePhase::Running,
            cause: None,
            events: Vec::new(),
            time: 0.0,
            ticks: 0,
            kills: 0,
            world,
        })
    }

    pub fn world_size(&self) -> Vec2 {
        self.world
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn player(&self) -> Option<&Entity> {
        self.registry.get(self.player)
    }

    pub fn player_center(&self) -> Vec2 {
        self.player().map_or(Vec2::ZERO, Entity::center)
    }

    /// Enter the terminal phase. Later calls are ignored.
    pub fn terminate(&mut self, cause: TerminationCause) {
        if self.phase == GamePhase::Terminated {
            return;
        }
        self.phase = GamePhase::Terminated;
        self.cause = Some(cause);
        self.events.push(GameEvent::GameOver { cause });
        log::info!(
            "Run over ({:?}) after {:.1}s, {} kills",
            cause,
            self.time,
            self.kills
        );
    }

    /// Current animation frame of a drawable/collidable entity
    pub fn frame_of(&self, entity: &Entity) -> Option<&Frame> {
        let index = entity.frame.index;
        match &entity.kind {
            EntityKind::Player(_) => Some(self.atlas.player(entity.frame.facing).frame(index)),
            EntityKind::Enemy(enemy) => Some(self.atlas.enemy(enemy.kind).frame(index)),
            EntityKind::Effect(effect) => Some(self.atlas.enemy(effect.kind).frame(index)),
            EntityKind::Projectile(_) => Some(self.atlas.bullet().frame(index)),
            EntityKind::Obstacle(_) | EntityKind::Ground(_) => None,
        }
    }

    /// Precise sprite contact between two entities
    pub fn entities_touch(&self, a: &Entity, b: &Entity) -> bool {
        self.touches_at(a, &a.rect, b)
    }

    /// `entities_touch` with `a` placed at `a_rect` instead of its own rect
    pub fn touches_at(&self, a: &Entity, a_rect: &Rect, b: &Entity) -> bool {
        match (self.frame_of(a), self.frame_of(b)) {
            (Some(fa), Some(fb)) => rects_collide_precise(a_rect, &fa.mask, &b.rect, &fb.mask),
            _ => a_rect.intersects(&b.rect),
        }
    }

    /// Queue a radial volley from the player's center
    pub fn spawn_volley(&mut self, directions: &[Vec2]) {
        let origin = self.player_center();
        let size = self.atlas.bullet().frame(0).size;
        for &direction in directions {
            let bullet = Entity::projectile(
                origin,
                size,
                direction,
                self.settings.bullet_speed,
                self.settings.bullet_lifetime,
            );
            self.registry
                .queue_spawn(bullet, &[Group::Render, Group::Projectiles]);
        }
        self.events.push(GameEvent::Shot {
            origin,
            count: directions.len() as u32,
        });
    }

    /// Queue one enemy of a random type at a valid position.
    ///
    /// Returns `None` when random placement found no free spot.
    pub fn spawn_enemy(&mut self) -> Option<EntityId> {
        let kind = self.spawner.choose_type(&mut self.rng);
        let hitbox = enemy_hitbox_size(&self.atlas, &self.settings, kind);
        let keep_clear = Rect::from_center(
            self.player_center(),
            Vec2::splat(2.0 * RANDOM_SPAWN_CLEARANCE),
        );
        let Some(pos) = self.spawner.choose_position(
            &mut self.rng,
            self.world,
            hitbox,
            &self.obstacles,
            &keep_clear,
        ) else {
            log::debug!("No free spot for a {} this tick", self.atlas.enemy_name(kind));
            return None;
        };
        let size = self.atlas.enemy(kind).frame(0).size;
        let enemy = Entity::enemy(
            pos,
            size,
            self.settings.enemy_hitbox_shrink,
            kind,
            self.settings.enemy_speed,
        );
        let id = self
            .registry
            .queue_spawn(enemy, &[Group::Render, Group::Enemies]);
        log::debug!(
            "Spawned {} #{} at ({:.0}, {:.0})",
            self.atlas.enemy_name(kind),
            id.0,
            pos.x,
            pos.y
        );
        self.events.push(GameEvent::EnemySpawned { id, kind, pos });
        Some(id)
    }

    /// Retire a killed enemy and leave its hit flash behind
    pub fn kill_enemy(&mut self, id: EntityId) {
        let Some(entity) = self.registry.get(id) else {
            return;
        };
        let EntityKind::Enemy(enemy) = &entity.kind else {
            return;
        };
        let (kind, rect, frame, pos) = (enemy.kind, entity.rect, entity.frame, entity.center());
        if !self.registry.queue_kill(id) {
            return;
        }
        if self.settings.impact_duration > 0.0 {
            let flash = Entity::effect(rect, frame, kind, self.settings.impact_duration);
            self.registry
                .queue_spawn(flash, &[Group::Render, Group::Effects]);
        }
        self.kills += 1;
        self.events.push(GameEvent::EnemyKilled { id, kind, pos });
    }
}

fn enemy_hitbox_size(atlas: &SpriteAtlas, settings: &Settings, kind: EnemyType) -> Vec2 {
    let size = atlas.enemy(kind).frame(0).size;
    size - Vec2::new(settings.enemy_hitbox_shrink.0, settings.enemy_hitbox_shrink.1)
}

fn check_hitbox(what: &'static str, hitbox: &Rect) -> Result<(), SetupError> {
    if hitbox.is_empty() {
        return Err(SetupError::DegenerateHitbox {
            what,
            width: hitbox.width(),
            height: hitbox.height(),
        });
    }
    Ok(())
}
