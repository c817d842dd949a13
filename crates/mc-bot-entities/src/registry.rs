//! Entity registry: the single owner of every tracked [`Entity`].

use std::collections::HashMap;

use crate::entity::{Entity, EntityId};

#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: HashMap<EntityId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live record for `id`, created with default state on first reference.
    pub fn get_or_create(&mut self, id: EntityId) -> &mut Entity {
        self.entities.entry(id).or_insert_with(|| Entity::new(id))
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

    /// Evict `id`, returning the record marked invalid. A later reference to the same
    /// numeric id creates a fresh record.
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(&id)?;
        entity.is_valid = false;
        Some(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All live entities, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_bot_proto::packets::EntityKind;
    use mc_bot_proto::types::Vec3;

    #[test]
    fn get_or_create_returns_same_record() {
        let mut registry = EntityRegistry::new();
        registry.get_or_create(3).position = Vec3::new(1.0, 2.0, 3.0);
        let first = registry.get_or_create(3) as *const Entity;
        let second = registry.get_or_create(3) as *const Entity;
        assert_eq!(first, second);
        assert_eq!(registry.get(3).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn destroy_evicts_and_invalidates() {
        let mut registry = EntityRegistry::new();
        registry.get_or_create(5).kind = EntityKind::Mob;
        let gone = registry.destroy(5).unwrap();
        assert!(!gone.is_valid);
        assert_eq!(gone.kind, EntityKind::Mob);
        assert!(!registry.contains(5));
        assert!(registry.is_empty());
    }

    #[test]
    fn reused_id_gets_fresh_record() {
        let mut registry = EntityRegistry::new();
        registry.get_or_create(5).kind = EntityKind::Mob;
        registry.destroy(5);
        let fresh = registry.get_or_create(5);
        assert_eq!(fresh.kind, EntityKind::Unknown);
        assert!(fresh.is_valid);
    }

    #[test]
    fn destroy_unknown_is_none() {
        let mut registry = EntityRegistry::new();
        assert!(registry.destroy(42).is_none());
    }
}
