//! Simulation tick
//!
//! Advances the world by one frame of `dt` seconds. Phase order within a tick:
//! quit check, enemy spawns, gun cooldown and volley, spawn flush, movement
//! (player first), projectile hits, player contact, kill flush, camera.

use std::collections::BTreeSet;

use glam::{IVec2, Vec2};

use super::collision::overlaps_any;
use super::entity::{Entity, EntityId, UpdateContext, UpdateOutcome};
use super::geom::Rect;
use super::registry::Group;
use super::state::{GameEvent, GamePhase, SimulationState, TerminationCause};
use crate::consts::MAX_SWEEP_SAMPLES;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held movement keys, each axis in -1..=1 (see `axis_input`)
    pub direction: IVec2,
    /// Fire request, only consulted when auto fire is off
    pub fire: bool,
    /// Window close or quit key
    pub quit: bool,
}

/// Advance the simulation by `dt` seconds. No-op once terminated.
pub fn tick(state: &mut SimulationState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::Terminated {
        return;
    }
    state.events.clear();

    if input.quit {
        state.terminate(TerminationCause::Quit);
        return;
    }

    // Enemy spawn timer
    let spawns = state.spawner.update(dt, &mut state.rng);
    for _ in 0..spawns {
        state.spawn_enemy();
    }

    // Gun cooldown, then the volley if requested
    let fire = state.settings.auto_fire || input.fire;
    let volley_size = state.settings.volley_size;
    let volley = state
        .registry
        .get_mut(state.player)
        .and_then(Entity::as_player_mut)
        .and_then(|player| {
            player.gun.update(dt);
            if fire {
                player.gun.fire(volley_size)
            } else {
                None
            }
        });
    if let Some(directions) = volley {
        state.spawn_volley(&directions);
    }

    // Fresh spawns move this tick
    state.registry.flush();

    let direction = input.direction.as_vec2().normalize_or_zero();
    if let Some(player) = state
        .registry
        .get_mut(state.player)
        .and_then(Entity::as_player_mut)
    {
        player.direction = direction;
    }

    update_entities(state, dt);
    resolve_projectiles(state);

    if state.settings.player_death {
        if let Some(by) = enemy_touching_player(state) {
            state.events.push(GameEvent::PlayerCaught { by });
            state.terminate(TerminationCause::PlayerCaught);
        }
    }

    state.registry.flush();

    let target = state.player_center();
    state.camera.update(target);

    state.time += dt;
    state.ticks += 1;
}

/// Move and animate everything. The player goes first so enemies home on
/// its new position.
fn update_entities(state: &mut SimulationState, dt: f32) {
    let mut ctx = UpdateContext {
        obstacles: &state.obstacles,
        target: Vec2::ZERO,
        player_animation_rate: state.settings.player_animation_rate,
        enemy_animation_rate: state.settings.enemy_animation_rate,
    };

    let player_id = state.player;
    if let Some(player) = state.registry.get_mut(player_id) {
        player.update(dt, &ctx);
        ctx.target = player.center();
    }

    let mut expired = Vec::new();
    for (id, entity) in state.registry.iter_mut() {
        if id == player_id {
            continue;
        }
        if entity.update(dt, &ctx) == UpdateOutcome::Expired {
            expired.push(id);
        }
    }
    for id in expired {
        state.registry.queue_kill(id);
    }
}

/// Projectile pass: a bullet kills every live enemy it touches and is spent;
/// a bullet that touches no enemy but hits an obstacle is spent too.
///
/// Each bullet is checked along the step it just took, and the first
/// position with any contact decides. An enemy already struck this pass
/// cannot be struck again.
fn resolve_projectiles(state: &mut SimulationState) {
    let mut struck_enemies: BTreeSet<EntityId> = BTreeSet::new();
    let mut hits: Vec<(EntityId, Vec2, Vec<EntityId>)> = Vec::new();
    let mut blocked = Vec::new();

    for (bullet_id, bullet) in state.registry.iter_group(Group::Projectiles) {
        let step = bullet.as_projectile().map_or(Vec2::ZERO, |p| p.step);
        for rect in swept_rects(bullet.rect, step) {
            let struck: Vec<EntityId> = state
                .registry
                .iter_group(Group::Enemies)
                .filter(|(id, enemy)| {
                    !struck_enemies.contains(id) && state.touches_at(bullet, &rect, enemy)
                })
                .map(|(id, _)| id)
                .collect();

            if !struck.is_empty() {
                struck_enemies.extend(struck.iter().copied());
                hits.push((bullet_id, rect.center(), struck));
                break;
            }
            if overlaps_any(&rect, &state.obstacles) {
                blocked.push(bullet_id);
                break;
            }
        }
    }

    for id in blocked {
        state.registry.queue_kill(id);
    }
    for (bullet_id, pos, struck) in hits {
        state.registry.queue_kill(bullet_id);
        state.events.push(GameEvent::Impact { pos });
        for enemy in struck {
            state.kill_enemy(enemy);
        }
    }
}

/// Positions along `step` ending at `rect`, oldest first, no further apart
/// than the rect's own size on either axis
fn swept_rects(rect: Rect, step: Vec2) -> impl Iterator<Item = Rect> {
    let spans = (step.abs() / rect.size).max_element().ceil();
    let count = if spans.is_finite() {
        (spans as u32).clamp(1, MAX_SWEEP_SAMPLES)
    } else {
        1
    };
    (1..=count).map(move |i| rect.translated(-step * (1.0 - i as f32 / count as f32)))
}

/// First live enemy whose sprite touches the player's
fn enemy_touching_player(state: &SimulationState) -> Option<EntityId> {
    let player = state.player()?;
    state
        .registry
        .iter_group(Group::Enemies)
        .find(|(_, enemy)| state.entities_touch(player, enemy))
        .map(|(id, _)| id)
}
