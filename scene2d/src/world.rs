use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Get the underlying integer ID (useful for debugging or serialization).
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

/// Allocator for entity ids.
///
/// Ids are never reused for the lifetime of the allocator, so a stale id held
/// by a torn-down scene can never alias an entity of the next scene.
pub struct Entities {
    next_id: u32,
    alive: HashSet<EntityId>,
}

impl Entities {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            alive: HashSet::new(),
        }
    }

    /// Spawn a new entity and return its `EntityId`.
    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.alive.insert(id);
        id
    }

    /// Despawn an entity. Returns whether it was alive.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        self.alive.remove(&entity)
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    /// Number of alive entities.
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Despawn everything, keeping the id counter.
    pub fn clear(&mut self) {
        self.alive.clear();
    }
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}
