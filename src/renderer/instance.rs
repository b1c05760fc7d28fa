//! Sprite instance data for the host renderer

use bytemuck::{Pod, Zeroable};

use crate::sim::{EnemyType, Entity, EntityKind, Facing, Rect};

/// Which texture an instance samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKey {
    /// Ground tile image
    Ground(u32),
    /// Visible obstacle image
    Object(u32),
    Player(Facing),
    Enemy(EnemyType),
    Bullet,
    /// White silhouette of a killed enemy
    Impact(EnemyType),
}

impl SpriteKey {
    const TAG_SHIFT: u32 = 24;
    const PAYLOAD_MASK: u32 = 0x00FF_FFFF;

    /// Sprite for an entity, or `None` when it is not drawn
    pub fn for_entity(entity: &Entity) -> Option<Self> {
        match &entity.kind {
            EntityKind::Ground(tile) => Some(SpriteKey::Ground(tile.image)),
            EntityKind::Obstacle(obstacle) => obstacle.image.map(SpriteKey::Object),
            EntityKind::Player(_) => Some(SpriteKey::Player(entity.frame.facing)),
            EntityKind::Enemy(enemy) => Some(SpriteKey::Enemy(enemy.kind)),
            EntityKind::Projectile(_) => Some(SpriteKey::Bullet),
            EntityKind::Effect(effect) => Some(SpriteKey::Impact(effect.kind)),
        }
    }

    /// Tag in the top byte, payload in the low 24 bits
    pub fn pack(self) -> u32 {
        let (tag, payload) = match self {
            SpriteKey::Ground(image) => (0, image),
            SpriteKey::Object(image) => (1, image),
            SpriteKey::Player(facing) => (2, facing as u32),
            SpriteKey::Enemy(kind) => (3, u32::from(kind.0)),
            SpriteKey::Bullet => (4, 0),
            SpriteKey::Impact(kind) => (5, u32::from(kind.0)),
        };
        (tag << Self::TAG_SHIFT) | (payload & Self::PAYLOAD_MASK)
    }

    pub fn unpack(raw: u32) -> Option<Self> {
        let payload = raw & Self::PAYLOAD_MASK;
        let key = match raw >> Self::TAG_SHIFT {
            0 => SpriteKey::Ground(payload),
            1 => SpriteKey::Object(payload),
            2 => SpriteKey::Player(*Facing::ALL.get(payload as usize)?),
            3 => SpriteKey::Enemy(EnemyType(u16::try_from(payload).ok()?)),
            4 => SpriteKey::Bullet,
            5 => SpriteKey::Impact(EnemyType(u16::try_from(payload).ok()?)),
            _ => return None,
        };
        Some(key)
    }
}

/// One textured quad in screen space (must match the host's vertex layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner after the camera offset
    pub position: [f32; 2],
    pub size: [f32; 2],
    /// Packed `SpriteKey`
    pub sprite: u32,
    /// Animation frame index (wrapped by the renderer)
    pub frame: u32,
}

impl SpriteInstance {
    pub fn new(screen_rect: &Rect, key: SpriteKey, frame: usize) -> Self {
        Self {
            position: screen_rect.pos.to_array(),
            size: screen_rect.size.to_array(),
            sprite: key.pack(),
            frame: frame as u32,
        }
    }

    pub fn key(&self) -> Option<SpriteKey> {
        SpriteKey::unpack(self.sprite)
    }
}
