//! Level description
//!
//! What the map loader hands over: ground tiles, static objects and named
//! entity markers. Parsing the editor's native format is the loader's job;
//! this is the flattened result, which also round-trips through JSON.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;
use crate::error::SetupError;
use crate::sim::Rect;

/// Name of the entity marker the player starts at
pub const PLAYER_MARKER: &str = "Player";

/// One ground tile, in tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub x: u32,
    pub y: u32,
    pub image: u32,
}

/// A static object in world units (top-left corner).
///
/// Objects with an image are drawn and collide; objects without one are
/// invisible collision volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectPlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub image: Option<u32>,
}

impl ObjectPlacement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A named point: the player start, or an enemy spawn point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMarker {
    pub name: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub tile_size: f32,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    #[serde(default)]
    pub ground: Vec<TilePlacement>,
    #[serde(default)]
    pub objects: Vec<ObjectPlacement>,
    #[serde(default)]
    pub entities: Vec<EntityMarker>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level {} ({}x{} tiles, {} objects)",
            path.display(),
            level.width,
            level.height,
            level.objects.len()
        );
        Ok(level)
    }

    /// World size in world units
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }

    /// Center of the player marker
    pub fn player_start(&self) -> Result<Vec2, SetupError> {
        self.entities
            .iter()
            .find(|m| m.name == PLAYER_MARKER)
            .map(|m| Vec2::new(m.x, m.y))
            .ok_or(SetupError::MissingPlayerStart)
    }

    /// Every marker that is not the player start
    pub fn spawn_points(&self) -> Vec<Vec2> {
        self.entities
            .iter()
            .filter(|m| m.name != PLAYER_MARKER)
            .map(|m| Vec2::new(m.x, m.y))
            .collect()
    }

    /// A walled arena used by the headless binary and tests.
    ///
    /// 30x20 grass tiles, an invisible wall around the edge, four pillars,
    /// the player in the middle and a spawn point near each corner.
    pub fn demo() -> Self {
        let (width, height) = (30u32, 20u32);
        let tile = TILE_SIZE;
        let world = Vec2::new(width as f32, height as f32) * tile;

        let ground = (0..height)
            .flat_map(|y| (0..width).map(move |x| TilePlacement { x, y, image: 0 }))
            .collect();

        let wall = |x: f32, y: f32, w: f32, h: f32| ObjectPlacement {
            x,
            y,
            width: w,
            height: h,
            image: None,
        };
        let pillar = |x: f32, y: f32, image: u32| ObjectPlacement {
            x,
            y,
            width: tile * 2.0,
            height: tile * 2.0,
            image: Some(image),
        };
        let objects = vec![
            wall(-tile, -tile, world.x + 2.0 * tile, tile),
            wall(-tile, world.y, world.x + 2.0 * tile, tile),
            wall(-tile, 0.0, tile, world.y),
            wall(world.x, 0.0, tile, world.y),
            pillar(tile * 6.0, tile * 5.0, 1),
            pillar(tile * 22.0, tile * 5.0, 2),
            pillar(tile * 6.0, tile * 13.0, 2),
            pillar(tile * 22.0, tile * 13.0, 1),
        ];

        let marker = |name: &str, x: f32, y: f32| EntityMarker {
            name: name.to_string(),
            x,
            y,
        };
        let entities = vec![
            marker(PLAYER_MARKER, world.x * 0.5, world.y * 0.5),
            marker("Spawn", tile * 2.0, tile * 2.0),
            marker("Spawn", world.x - tile * 2.0, tile * 2.0),
            marker("Spawn", tile * 2.0, world.y - tile * 2.0),
            marker("Spawn", world.x - tile * 2.0, world.y - tile * 2.0),
        ];

        Self {
            tile_size: tile,
            width,
            height,
            ground,
            objects,
            entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_level_shape() {
        let level = Level::demo();
        assert_eq!(level.ground.len(), 600);
        assert_eq!(level.world_size(), Vec2::new(1920.0, 1280.0));
        assert_eq!(level.player_start().expect("player"), Vec2::new(960.0, 640.0));
        assert_eq!(level.spawn_points().len(), 4);
    }

    #[test]
    fn test_json_roundtrip_minimal() {
        let json = r#"{
            "tile_size": 32.0,
            "width": 4,
            "height": 3,
            "objects": [{ "x": 0.0, "y": 0.0, "width": 32.0, "height": 32.0 }],
            "entities": [
                { "name": "Player", "x": 64.0, "y": 48.0 },
                { "name": "Bat", "x": 100.0, "y": 80.0 }
            ]
        }"#;
        let level = Level::from_json(json).expect("valid level");
        assert!(level.ground.is_empty());
        assert_eq!(level.objects[0].image, None);
        assert_eq!(level.spawn_points(), vec![Vec2::new(100.0, 80.0)]);
    }

    #[test]
    fn test_missing_player_marker() {
        let mut level = Level::demo();
        level.entities.retain(|m| m.name != PLAYER_MARKER);
        assert!(matches!(
            level.player_start(),
            Err(SetupError::MissingPlayerStart)
        ));
    }
}
