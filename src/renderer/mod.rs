//! Draw list construction
//!
//! The simulation never draws. Each frame the host gets the render group as
//! camera-space sprite instances in paint order: ground tiles first, then
//! everything else sorted by the vertical center of its rect so sprites lower
//! on screen overlap the ones above them.

pub mod instance;

pub use instance::{SpriteInstance, SpriteKey};

use glam::Vec2;

use crate::sim::{EntityId, EntityKind, Group, SimulationState};

/// Presents a finished draw list. Implemented by the host's graphics backend.
pub trait Renderer {
    fn draw(&mut self, viewport: Vec2, instances: &[SpriteInstance]);
}

/// Renderer with no output; logs draw counts. Used by the headless binary.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, viewport: Vec2, instances: &[SpriteInstance]) {
        self.frames += 1;
        log::trace!(
            "Frame {}: {} sprites in {}x{} viewport",
            self.frames,
            instances.len(),
            viewport.x,
            viewport.y
        );
    }
}

/// Render group in paint order, in screen coordinates
pub fn build_draw_list(state: &SimulationState) -> Vec<SpriteInstance> {
    let mut ground = Vec::new();
    let mut sorted: Vec<(f32, EntityId, SpriteInstance)> = Vec::new();

    for (id, entity) in state.registry.iter_group(Group::Render) {
        let Some(key) = SpriteKey::for_entity(entity) else {
            continue;
        };
        let bounds = entity.bounds();
        let instance = SpriteInstance::new(&state.camera.apply(&bounds), key, entity.frame.index);
        if matches!(entity.kind, EntityKind::Ground(_)) {
            ground.push(instance);
        } else {
            sorted.push((bounds.center().y, id, instance));
        }
    }

    // Ties keep creation order
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    ground.extend(sorted.into_iter().map(|(_, _, instance)| instance));
    ground
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{EntityMarker, Level, ObjectPlacement, PLAYER_MARKER, TilePlacement};
    use crate::settings::Settings;
    use crate::sim::{EnemyType, Entity, Facing, SpriteAtlas};

    fn state_with(level: &Level) -> SimulationState {
        let atlas = SpriteAtlas::solid((128, 128), &["bat"], (64, 64), (16, 16), 4)
            .expect("valid atlas");
        SimulationState::new(Settings::default(), level, atlas).expect("valid setup")
    }

    fn small_level() -> Level {
        Level {
            tile_size: 64.0,
            width: 40,
            height: 40,
            ground: vec![
                TilePlacement { x: 0, y: 39, image: 0 },
                TilePlacement { x: 20, y: 20, image: 1 },
            ],
            objects: vec![
                ObjectPlacement {
                    x: 1000.0,
                    y: 1400.0,
                    width: 64.0,
                    height: 64.0,
                    image: Some(4),
                },
                ObjectPlacement {
                    x: 0.0,
                    y: 0.0,
                    width: 64.0,
                    height: 64.0,
                    image: None,
                },
            ],
            entities: vec![
                EntityMarker {
                    name: PLAYER_MARKER.to_string(),
                    x: 1280.0,
                    y: 1280.0,
                },
                EntityMarker {
                    name: "Spawn".to_string(),
                    x: 200.0,
                    y: 200.0,
                },
            ],
        }
    }

    #[test]
    fn test_ground_first_then_y_sorted() {
        let state = state_with(&small_level());
        let keys: Vec<SpriteKey> = build_draw_list(&state)
            .iter()
            .filter_map(SpriteInstance::key)
            .collect();
        // The lower ground tile still paints before the player; the pillar
        // sits lower than the player so it paints last.
        assert_eq!(
            keys,
            vec![
                SpriteKey::Ground(0),
                SpriteKey::Ground(1),
                SpriteKey::Player(Facing::Down),
                SpriteKey::Object(4),
            ]
        );
    }

    #[test]
    fn test_positions_are_camera_relative() {
        let state = state_with(&small_level());
        let list = build_draw_list(&state);
        let player = list
            .iter()
            .find(|i| matches!(i.key(), Some(SpriteKey::Player(_))))
            .expect("player drawn");
        // Centered in the 1280x720 viewport
        assert_eq!(player.position, [640.0 - 64.0, 360.0 - 64.0]);
        assert_eq!(player.size, [128.0, 128.0]);
    }

    #[test]
    fn test_equal_heights_keep_creation_order() {
        let mut state = state_with(&small_level());
        let center = Vec2::new(600.0, 600.0);
        for kind in [EnemyType(0), EnemyType(1)] {
            let enemy = Entity::enemy(center, Vec2::splat(64.0), (20.0, 40.0), kind, 200.0);
            state
                .registry
                .insert(enemy, &[Group::Render, Group::Enemies]);
        }
        let enemies: Vec<SpriteKey> = build_draw_list(&state)
            .iter()
            .filter_map(SpriteInstance::key)
            .filter(|k| matches!(k, SpriteKey::Enemy(_)))
            .collect();
        assert_eq!(
            enemies,
            vec![SpriteKey::Enemy(EnemyType(0)), SpriteKey::Enemy(EnemyType(1))]
        );
    }

    #[test]
    fn test_killed_entities_not_drawn() {
        let mut state = state_with(&small_level());
        let enemy = Entity::enemy(
            Vec2::new(600.0, 600.0),
            Vec2::splat(64.0),
            (20.0, 40.0),
            EnemyType(0),
            200.0,
        );
        let id = state
            .registry
            .insert(enemy, &[Group::Render, Group::Enemies]);
        assert_eq!(build_draw_list(&state).len(), 5);

        // Dead as soon as the kill is queued, before the flush
        state.registry.queue_kill(id);
        assert_eq!(build_draw_list(&state).len(), 4);
    }

    #[test]
    fn test_log_renderer_counts_frames() {
        let state = state_with(&small_level());
        let mut renderer = LogRenderer::new();
        renderer.draw(state.camera.viewport, &build_draw_list(&state));
        renderer.draw(state.camera.viewport, &build_draw_list(&state));
        assert_eq!(renderer.frames(), 2);
    }
}
