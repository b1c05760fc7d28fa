//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through `dt`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod animation;
pub mod camera;
pub mod collision;
pub mod entity;
pub mod geom;
pub mod mask;
pub mod registry;
pub mod spawner;
pub mod sprites;
pub mod state;
pub mod tick;

pub use animation::{Facing, FrameState};
pub use camera::Camera;
pub use collision::{move_and_slide, rects_collide_precise};
pub use entity::{Entity, EntityId, EntityKind};
pub use geom::Rect;
pub use mask::Mask;
pub use registry::{Group, Registry};
pub use spawner::{EnemySpawner, Gun};
pub use sprites::{EnemyType, Frame, FrameSet, SpriteAtlas};
pub use state::{GameEvent, GamePhase, SimulationState, TerminationCause};
pub use tick::{TickInput, tick};
