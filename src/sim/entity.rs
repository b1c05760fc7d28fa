//! Entity model
//!
//! One `Entity` struct carries what every variant shares (visual rect,
//! collision hitbox, animation state, liveness); `EntityKind` carries the
//! variant-specific data. Entities are owned by the `Registry` and addressed
//! by `EntityId`.

use glam::Vec2;

use super::animation::FrameState;
use super::collision::move_and_slide;
use super::geom::Rect;
use super::spawner::Gun;
use super::sprites::EnemyType;

/// Stable handle into the registry. Allocated in increasing order, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    /// Unit (or zero) movement direction sampled this tick
    pub direction: Vec2,
    pub speed: f32,
    pub gun: Gun,
}

/// A homing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyType,
    pub speed: f32,
    /// Last direction toward the player
    pub direction: Vec2,
}

/// A bullet flying in a fixed direction until it expires or hits something
#[derive(Debug, Clone)]
pub struct Projectile {
    pub direction: Vec2,
    pub speed: f32,
    /// Time-to-live in seconds
    pub ttl: f32,
    /// Seconds since creation
    pub age: f32,
    /// Displacement applied by the last update
    pub step: Vec2,
}

/// Static collision geometry. `image` is `None` for invisible volumes.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub image: Option<u32>,
}

/// Render-only floor tile
#[derive(Debug, Clone)]
pub struct GroundTile {
    pub image: u32,
}

/// Render-only hit flash left behind by a killed enemy
#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EnemyType,
    pub remaining: f32,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(Player),
    Enemy(Enemy),
    Projectile(Projectile),
    Obstacle(Obstacle),
    Ground(GroundTile),
    Effect(Effect),
}

/// Everything an entity update may read besides itself
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    /// Static obstacle rects for sliding collision
    pub obstacles: &'a [Rect],
    /// Player center (enemies home toward it)
    pub target: Vec2,
    pub player_animation_rate: f32,
    pub enemy_animation_rate: f32,
}

/// What the loop should do with an entity after its update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Alive,
    /// Lifetime ran out; retire it
    Expired,
}

#[derive(Debug, Clone)]
pub struct Entity {
    /// Visual rect (sprite bounds); its center is the entity position
    pub rect: Rect,
    /// Collision footprint against obstacles. Equal to `rect` unless shrunk.
    pub hitbox: Rect,
    pub frame: FrameState,
    pub alive: bool,
    pub kind: EntityKind,
}

impl Entity {
    fn new(rect: Rect, hitbox: Rect, kind: EntityKind) -> Self {
        Self {
            rect,
            hitbox,
            frame: FrameState::default(),
            alive: true,
            kind,
        }
    }

    /// Player centered on `center`, hitbox shrunk by `shrink` (width, height)
    pub fn player(center: Vec2, size: Vec2, shrink: (f32, f32), speed: f32, gun: Gun) -> Self {
        let rect = Rect::from_center(center, size);
        let hitbox = rect.inflate(-shrink.0, -shrink.1);
        Self::new(
            rect,
            hitbox,
            EntityKind::Player(Player {
                direction: Vec2::ZERO,
                speed,
                gun,
            }),
        )
    }

    pub fn enemy(
        center: Vec2,
        size: Vec2,
        shrink: (f32, f32),
        kind: EnemyType,
        speed: f32,
    ) -> Self {
        let rect = Rect::from_center(center, size);
        let hitbox = rect.inflate(-shrink.0, -shrink.1);
        Self::new(
            rect,
            hitbox,
            EntityKind::Enemy(Enemy {
                kind,
                speed,
                direction: Vec2::ZERO,
            }),
        )
    }

    pub fn projectile(center: Vec2, size: Vec2, direction: Vec2, speed: f32, ttl: f32) -> Self {
        let rect = Rect::from_center(center, size);
        Self::new(
            rect,
            rect,
            EntityKind::Projectile(Projectile {
                direction,
                speed,
                ttl,
                age: 0.0,
                step: Vec2::ZERO,
            }),
        )
    }

    pub fn obstacle(rect: Rect, image: Option<u32>) -> Self {
        Self::new(rect, rect, EntityKind::Obstacle(Obstacle { image }))
    }

    pub fn ground(rect: Rect, image: u32) -> Self {
        Self::new(rect, rect, EntityKind::Ground(GroundTile { image }))
    }

    /// Flash at a killed enemy's rect, frozen on the frame it died in
    pub fn effect(rect: Rect, frame: FrameState, kind: EnemyType, duration: f32) -> Self {
        let mut entity = Self::new(
            rect,
            rect,
            EntityKind::Effect(Effect {
                kind,
                remaining: duration,
            }),
        );
        entity.frame = frame;
        entity
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EntityKind::Projectile(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Advance movement, animation and lifetime by `dt`.
    ///
    /// The player and enemies slide against `ctx.obstacles`; projectiles fly
    /// straight (obstacle hits are handled by the projectile pass).
    pub fn update(&mut self, dt: f32, ctx: &UpdateContext) -> UpdateOutcome {
        if !self.alive {
            return UpdateOutcome::Alive;
        }
        match &mut self.kind {
            EntityKind::Player(player) => {
                let displacement = player.direction * player.speed * dt;
                move_and_slide(&mut self.hitbox, displacement, ctx.obstacles);
                self.rect.set_center(self.hitbox.center());
                self.frame
                    .animate_facing(player.direction, dt, ctx.player_animation_rate);
                UpdateOutcome::Alive
            }
            EntityKind::Enemy(enemy) => {
                // Home on the player's current position
                enemy.direction = (ctx.target - self.rect.center()).normalize_or_zero();
                let displacement = enemy.direction * enemy.speed * dt;
                move_and_slide(&mut self.hitbox, displacement, ctx.obstacles);
                self.rect.set_center(self.hitbox.center());
                self.frame.animate(dt, true, ctx.enemy_animation_rate);
                UpdateOutcome::Alive
            }
            EntityKind::Projectile(bullet) => {
                let displacement = bullet.direction * bullet.speed * dt;
                self.rect = self.rect.translated(displacement);
                self.hitbox = self.rect;
                bullet.step = displacement;
                bullet.age += dt;
                if bullet.age >= bullet.ttl {
                    UpdateOutcome::Expired
                } else {
                    UpdateOutcome::Alive
                }
            }
            EntityKind::Effect(effect) => {
                effect.remaining -= dt;
                if effect.remaining <= 0.0 {
                    UpdateOutcome::Expired
                } else {
                    UpdateOutcome::Alive
                }
            }
            EntityKind::Obstacle(_) | EntityKind::Ground(_) => UpdateOutcome::Alive,
        }
    }
}
