use crate::api::types::EntityId;
use crate::components::entity::{Entity, EntityType};

/// Entity storage using a flat Vec, in spawn order.
/// Entities are never freed during a level: removal hides them.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(256),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// First visible entity of a kind.
    pub fn first_visible(&self, kind: EntityType) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.visible && e.entity_type() == kind)
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::EntityKind;
    use crate::components::kinds::{Enemy, Hero};
    use glam::Vec2;

    fn hero(id: u32) -> Entity {
        Entity::new(EntityId(id), EntityKind::Hero(Hero::default()))
    }

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        scene.spawn(hero(1).with_pos(Vec2::new(10.0, 20.0)));
        let e = scene.get(EntityId(1)).unwrap();
        assert_eq!(e.pos, Vec2::new(10.0, 20.0));
        assert!(scene.get(EntityId(2)).is_none());
    }

    #[test]
    fn lookup_by_id_in_spawn_order() {
        let mut scene = Scene::new();
        scene.spawn(hero(1));
        scene.spawn(Entity::new(EntityId(2), EntityKind::Enemy(Enemy::default())));

        let ids: Vec<EntityId> = scene.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(1), EntityId(2)]);
        assert_eq!(scene.len(), 2);
        if let Some(e) = scene.get_mut(EntityId(2)) {
            e.visible = false;
        }
        assert!(!scene.get(EntityId(2)).unwrap().visible);
    }

    #[test]
    fn first_visible_skips_hidden() {
        let mut scene = Scene::new();
        let mut gone = hero(1);
        gone.visible = false;
        scene.spawn(gone);
        scene.spawn(hero(2));

        let found = scene.first_visible(EntityType::Hero).unwrap();
        assert_eq!(found.id, EntityId(2));
        assert!(scene.first_visible(EntityType::Enemy).is_none());
    }
}
