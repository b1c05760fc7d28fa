//! Sprite frame metadata
//!
//! The simulation never touches pixels. It only needs each animation frame's
//! size (for the visual rect) and collision mask. The host loads the images,
//! builds a `SpriteAtlas` from them, and keeps the textures for drawing.

use std::collections::BTreeMap;

use glam::Vec2;

use super::animation::Facing;
use super::mask::Mask;
use crate::error::SetupError;

/// One animation frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub size: Vec2,
    pub mask: Mask,
}

impl Frame {
    /// Frame whose collision shape is its whole rect
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            size: Vec2::new(width as f32, height as f32),
            mask: Mask::filled(width, height),
        }
    }

    /// Frame with a per-pixel mask; size comes from the mask
    pub fn with_mask(mask: Mask) -> Self {
        Self {
            size: Vec2::new(mask.width() as f32, mask.height() as f32),
            mask,
        }
    }
}

/// An ordered, non-empty list of frames
#[derive(Debug, Clone)]
pub struct FrameSet {
    frames: Vec<Frame>,
}

impl FrameSet {
    /// Fails on an empty frame list or on frames of different sizes. An
    /// entity's rect is sized once from its first frame, and masks map 1:1
    /// onto that rect.
    pub fn new(name: &str, frames: Vec<Frame>) -> Result<Self, SetupError> {
        let Some(first) = frames.first() else {
            return Err(SetupError::EmptyFrameSet(name.to_string()));
        };
        if let Some(odd) = frames.iter().find(|f| f.size != first.size) {
            return Err(SetupError::MismatchedFrameSize {
                set: name.to_string(),
                expected: first.size,
                found: odd.size,
            });
        }
        Ok(Self { frames })
    }

    /// Size shared by every frame in the set
    pub fn frame_size(&self) -> Vec2 {
        self.frames[0].size
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the set has no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame for an ever-increasing animation index (wraps around)
    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index % self.frames.len()]
    }
}

/// Index into the atlas' enemy type pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnemyType(pub u16);

/// All frame sets the simulation animates
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    player: BTreeMap<Facing, FrameSet>,
    enemies: Vec<(String, FrameSet)>,
    bullet: FrameSet,
}

impl SpriteAtlas {
    /// Every facing must have a frame set, all facings must share one frame
    /// size, and the enemy pool must not be empty.
    pub fn new(
        player: BTreeMap<Facing, FrameSet>,
        enemies: Vec<(String, FrameSet)>,
        bullet: FrameSet,
    ) -> Result<Self, SetupError> {
        let mut player_size = None;
        for facing in Facing::ALL {
            let Some(set) = player.get(&facing) else {
                return Err(SetupError::EmptyFrameSet(format!(
                    "player/{}",
                    facing.as_str()
                )));
            };
            // Turning must not resize the player's rect
            let expected = *player_size.get_or_insert(set.frame_size());
            if set.frame_size() != expected {
                return Err(SetupError::MismatchedFrameSize {
                    set: format!("player/{}", facing.as_str()),
                    expected,
                    found: set.frame_size(),
                });
            }
        }
        if enemies.is_empty() {
            return Err(SetupError::NoEnemyTypes);
        }
        Ok(Self {
            player,
            enemies,
            bullet,
        })
    }

    /// Atlas of solid rectangles, handy for headless runs and tests.
    ///
    /// Player frames are `player` sized, every enemy type gets `enemy`, bullets
    /// get `bullet`. Each set has `frames` frames.
    pub fn solid(
        player: (u32, u32),
        enemy_names: &[&str],
        enemy: (u32, u32),
        bullet: (u32, u32),
        frames: usize,
    ) -> Result<Self, SetupError> {
        let make = |name: &str, (w, h): (u32, u32)| {
            FrameSet::new(name, (0..frames).map(|_| Frame::solid(w, h)).collect())
        };
        let mut player_sets = BTreeMap::new();
        for facing in Facing::ALL {
            player_sets.insert(facing, make(facing.as_str(), player)?);
        }
        let enemies = enemy_names
            .iter()
            .map(|name| Ok((name.to_string(), make(name, enemy)?)))
            .collect::<Result<Vec<_>, SetupError>>()?;
        Self::new(player_sets, enemies, make("bullet", bullet)?)
    }

    pub fn player(&self, facing: Facing) -> &FrameSet {
        // Constructor guarantees every facing is present
        &self.player[&facing]
    }

    pub fn enemy_type_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn enemy(&self, kind: EnemyType) -> &FrameSet {
        &self.enemies[kind.0 as usize % self.enemies.len()].1
    }

    pub fn enemy_name(&self, kind: EnemyType) -> &str {
        &self.enemies[kind.0 as usize % self.enemies.len()].0
    }

    pub fn bullet(&self) -> &FrameSet {
        &self.bullet
    }
}
