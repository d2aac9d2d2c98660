//! Id-keyed entity storage.
//!
//! Ids are handed out monotonically and never reused within a storage's
//! lifetime, so iteration in ascending id order is insertion order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::components::EntityId;

/// Storage for one kind of entity.
///
/// Uses a `HashMap` for O(1) entity lookup by ID, with deterministic
/// iteration via sorted keys when processing systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStorage<T> {
    /// Map of entity ID to entity data.
    entities: HashMap<EntityId, T>,
    /// Next entity ID to assign.
    next_id: EntityId,
}

impl<T> EntityStorage<T> {
    /// Create empty entity storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new entity and return its ID.
    pub fn insert(&mut self, entity: T) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity by ID.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.entities.remove(&id)
    }

    /// Get an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(&id)
    }

    /// Check if an entity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Get the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get sorted entity IDs for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over entities in ascending id order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.sorted_ids()
            .into_iter()
            .filter_map(move |id| self.entities.get(&id).map(|entity| (id, entity)))
    }

    /// Iterate over all entities (not in deterministic order).
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &T)> {
        self.entities.iter()
    }

    /// Remove every entity matching `dead`, returning removed ids in order.
    pub fn remove_where(&mut self, mut dead: impl FnMut(&T) -> bool) -> Vec<EntityId> {
        let mut removed: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, entity)| dead(entity))
            .map(|(id, _)| *id)
            .collect();
        removed.sort_unstable();
        for id in &removed {
            self.entities.remove(id);
        }
        removed
    }
}

impl<T> Default for EntityStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
