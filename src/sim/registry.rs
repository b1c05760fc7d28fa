//! Master entity registry and group membership
//!
//! The registry owns every entity. Groups are sets of ids layered on top; an
//! entity can be in several at once. Spawns and kills requested mid-pass are
//! queued and applied together by `flush`, which keeps iteration safe and
//! makes removal from the registry and all groups a single step.

use std::collections::{BTreeMap, BTreeSet};

use super::entity::{Entity, EntityId};

/// Membership sets used by the simulation passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    /// Drawn every frame
    Render,
    /// Static rects the player and enemies slide against
    Obstacles,
    Enemies,
    Projectiles,
    /// Render-only flashes with a lifetime
    Effects,
}

#[derive(Debug, Clone)]
struct PendingSpawn {
    id: EntityId,
    entity: Entity,
    groups: Vec<Group>,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    groups: BTreeMap<Group, BTreeSet<EntityId>>,
    pending_spawns: Vec<PendingSpawn>,
    pending_kills: BTreeSet<EntityId>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert immediately. Only for setup, outside any pass.
    pub fn insert(&mut self, entity: Entity, groups: &[Group]) -> EntityId {
        let id = self.allocate_id();
        self.entities.insert(id, entity);
        for &group in groups {
            self.groups.entry(group).or_default().insert(id);
        }
        id
    }

    /// Queue an entity to join the registry on the next `flush`.
    ///
    /// The id is reserved now so callers can refer to it in events.
    pub fn queue_spawn(&mut self, entity: Entity, groups: &[Group]) -> EntityId {
        let id = self.allocate_id();
        self.pending_spawns.push(PendingSpawn {
            id,
            entity,
            groups: groups.to_vec(),
        });
        id
    }

    /// Mark an entity dead and queue its removal.
    ///
    /// Returns false if it was already dead or queued, so each entity is
    /// retired exactly once.
    pub fn queue_kill(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        if !entity.alive {
            return false;
        }
        entity.alive = false;
        self.pending_kills.insert(id)
    }

    /// Whether `id` has a kill queued this pass
    pub fn is_pending_kill(&self, id: EntityId) -> bool {
        self.pending_kills.contains(&id)
    }

    /// Apply queued kills, then queued spawns. Returns (killed, spawned).
    pub fn flush(&mut self) -> (usize, usize) {
        let killed = self.pending_kills.len();
        for id in std::mem::take(&mut self.pending_kills) {
            self.entities.remove(&id);
            for members in self.groups.values_mut() {
                members.remove(&id);
            }
        }

        let spawned = self.pending_spawns.len();
        for spawn in std::mem::take(&mut self.pending_spawns) {
            self.entities.insert(spawn.id, spawn.entity);
            for group in spawn.groups {
                self.groups.entry(group).or_default().insert(spawn.id);
            }
        }
        (killed, spawned)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live registry entries (pending spawns excluded)
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn in_group(&self, id: EntityId, group: Group) -> bool {
        self.groups.get(&group).is_some_and(|m| m.contains(&id))
    }

    /// Members of `group` in ascending id order
    pub fn group(&self, group: Group) -> Vec<EntityId> {
        self.groups
            .get(&group)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn group_len(&self, group: Group) -> usize {
        self.groups.get(&group).map_or(0, BTreeSet::len)
    }

    /// Live entities of `group`, ascending id order
    pub fn iter_group(&self, group: Group) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.groups
            .get(&group)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entities.get(id).map(|e| (*id, e)))
            .filter(|(_, e)| e.is_alive())
    }

    /// All entities, ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.entities.iter_mut().map(|(id, e)| (*id, e))
    }

    /// Every grouped id is a registry entry
    pub fn membership_consistent(&self) -> bool {
        self.groups
            .values()
            .flatten()
            .all(|id| self.entities.contains_key(id))
    }
}
