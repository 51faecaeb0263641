//! EmberWorld - ECS world with stable IDs and dynamic components

use crate::component::DynamicComponents;
use crate::entity::EntityInfo;
use bimap::BiMap;
use ember_core::{EmberError, EntityId, Quat, Result, Transform, Vec3};
use std::collections::HashMap;

/// The main ECS world for Ember
///
/// Wraps hecs::World with:
/// - Stable EntityId mapping
/// - Dynamic component storage
/// - Named entity lookup and parent links
pub struct EmberWorld {
    /// The underlying hecs world
    world: hecs::World,
    /// Bidirectional mapping: EntityId <-> hecs::Entity
    id_map: BiMap<EntityId, hecs::Entity>,
    /// Entity name -> EntityId mapping
    name_map: HashMap<String, EntityId>,
    /// Dynamic components for each entity
    components: HashMap<EntityId, DynamicComponents>,
    /// Parent relationships: child -> parent
    parents: HashMap<EntityId, EntityId>,
}

impl Default for EmberWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl EmberWorld {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            world: hecs::World::new(),
            id_map: BiMap::new(),
            name_map: HashMap::new(),
            components: HashMap::new(),
            parents: HashMap::new(),
        }
    }

    /// Spawn a new entity with a name
    pub fn spawn(&mut self, name: impl Into<String>) -> Result<EntityId> {
        let name = name.into();

        if self.name_map.contains_key(&name) {
            return Err(EmberError::DuplicateEntityName(name));
        }

        let entity_id = EntityId::new();
        let hecs_entity = self.world.spawn(());

        self.id_map.insert(entity_id, hecs_entity);
        self.name_map.insert(name, entity_id);
        self.components.insert(entity_id, DynamicComponents::new());

        Ok(entity_id)
    }

    /// Despawn an entity
    pub fn despawn(&mut self, id: EntityId) -> Result<()> {
        let hecs_entity = self
            .id_map
            .get_by_left(&id)
            .ok_or_else(|| EmberError::EntityNotFound(id.to_string()))?;

        self.name_map.retain(|_, v| *v != id);
        self.world
            .despawn(*hecs_entity)
            .map_err(|_| EmberError::EntityNotFound(id.to_string()))?;

        self.id_map.remove_by_left(&id);
        self.components.remove(&id);
        self.parents.remove(&id);
        self.parents.retain(|_, parent| *parent != id);

        Ok(())
    }

    /// Get entity ID by name
    pub fn get_id(&self, name: &str) -> Option<EntityId> {
        self.name_map.get(name).copied()
    }

    /// Get entity name by ID
    pub fn get_name(&self, id: EntityId) -> Option<&str> {
        self.name_map
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
    }

    /// Get components for an entity
    pub fn get_components(&self, id: EntityId) -> Option<&DynamicComponents> {
        self.components.get(&id)
    }

    /// Get mutable components for an entity
    pub fn get_components_mut(&mut self, id: EntityId) -> Option<&mut DynamicComponents> {
        self.components.get_mut(&id)
    }

    /// Set a component on an entity
    pub fn set_component(&mut self, id: EntityId, component: &str, data: toml::Value) -> Result<()> {
        let components = self
            .components
            .get_mut(&id)
            .ok_or_else(|| EmberError::EntityNotFound(id.to_string()))?;

        components.set(component, data);
        Ok(())
    }

    /// Get a component from an entity
    pub fn get_component(&self, id: EntityId, component: &str) -> Option<&toml::Value> {
        self.components.get(&id).and_then(|c| c.get(component))
    }

    /// Set parent relationship
    pub fn set_parent(&mut self, child: EntityId, parent: EntityId) -> Result<()> {
        if !self.id_map.contains_left(&child) {
            return Err(EmberError::EntityNotFound(child.to_string()));
        }
        if !self.id_map.contains_left(&parent) {
            return Err(EmberError::EntityNotFound(parent.to_string()));
        }

        self.parents.insert(child, parent);
        Ok(())
    }

    /// Get parent of an entity
    pub fn get_parent(&self, child: EntityId) -> Option<EntityId> {
        self.parents.get(&child).copied()
    }

    /// Get info about all entities
    pub fn all_entities(&self) -> Vec<EntityInfo> {
        self.name_map
            .iter()
            .map(|(name, id)| {
                let components = self.components.get(id);
                let comp_names = components
                    .map(|c| c.component_names().into_iter().map(String::from).collect())
                    .unwrap_or_default();
                let parent = self
                    .parents
                    .get(id)
                    .and_then(|pid| self.get_name(*pid).map(String::from));

                EntityInfo {
                    id: *id,
                    name: name.clone(),
                    parent,
                    components: comp_names,
                }
            })
            .collect()
    }

    /// Get number of entities
    pub fn entity_count(&self) -> usize {
        self.name_map.len()
    }

    /// Check if an entity exists
    pub fn contains(&self, id: EntityId) -> bool {
        self.id_map.contains_left(&id)
    }

    /// Clear the world
    pub fn clear(&mut self) {
        self.world.clear();
        self.id_map.clear();
        self.name_map.clear();
        self.components.clear();
        self.parents.clear();
    }

    /// Get the local transform from an entity's `transform` component
    ///
    /// Reads `position`/`rotation`/`scale` fields; rotation is Euler degrees.
    pub fn get_transform(&self, id: EntityId) -> Option<Transform> {
        let components = self.components.get(&id)?;
        let transform_data = components.get("transform")?;

        let pos = transform_data
            .get("position")
            .and_then(parse_vec3)
            .unwrap_or(Vec3::ZERO);
        let rot = transform_data
            .get("rotation")
            .and_then(parse_vec3)
            .unwrap_or(Vec3::ZERO);
        let scale = transform_data
            .get("scale")
            .and_then(parse_vec3)
            .unwrap_or(Vec3::ONE);

        Some(Transform {
            position: pos,
            rotation: Quat::from_euler_deg(rot.x, rot.y, rot.z),
            scale,
        })
    }

    /// Get the world-space transform for an entity, walking the parent chain
    pub fn get_world_transform(&self, id: EntityId) -> Option<Transform> {
        let local = self.get_transform(id)?;
        match self.parents.get(&id) {
            Some(parent_id) => {
                let parent = self.get_world_transform(*parent_id)?;
                Some(Transform {
                    position: parent.apply(local.position),
                    rotation: parent.rotation * local.rotation,
                    scale: Vec3::new(
                        parent.scale.x * local.scale.x,
                        parent.scale.y * local.scale.y,
                        parent.scale.z * local.scale.z,
                    ),
                })
            }
            None => Some(local),
        }
    }

    /// Get the world-space position for an entity
    pub fn get_world_position(&self, id: EntityId) -> Option<Vec3> {
        self.get_world_transform(id).map(|t| t.position)
    }
}

fn parse_vec3(value: &toml::Value) -> Option<Vec3> {
    if let Some(table) = value.as_table() {
        let x = table.get("x").and_then(|v| v.as_float()).unwrap_or(0.0) as f32;
        let y = table.get("y").and_then(|v| v.as_float()).unwrap_or(0.0) as f32;
        let z = table.get("z").and_then(|v| v.as_float()).unwrap_or(0.0) as f32;
        return Some(Vec3::new(x, y, z));
    }

    if let Some(arr) = value.as_array() {
        if arr.len() >= 3 {
            let get = |i: usize| {
                arr[i]
                    .as_float()
                    .or_else(|| arr[i].as_integer().map(|n| n as f64))
                    .unwrap_or(0.0) as f32
            };
            return Some(Vec3::new(get(0), get(1), get(2)));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_get() {
        let mut world = EmberWorld::new();
        let id = world.spawn("test_entity").unwrap();

        assert!(world.contains(id));
        assert_eq!(world.get_id("test_entity"), Some(id));
        assert_eq!(world.get_name(id), Some("test_entity"));
    }

    #[test]
    fn despawn_removes_everything() {
        let mut world = EmberWorld::new();
        let id = world.spawn("test_entity").unwrap();

        world.despawn(id).unwrap();

        assert!(!world.contains(id));
        assert_eq!(world.get_id("test_entity"), None);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut world = EmberWorld::new();
        world.spawn("test").unwrap();

        assert!(matches!(
            world.spawn("test"),
            Err(EmberError::DuplicateEntityName(_))
        ));
    }

    #[test]
    fn transform_from_component() {
        let mut world = EmberWorld::new();
        let id = world.spawn("mover").unwrap();

        let data = toml::toml! {
            position = [1.0, 2.0, 3.0]
        };
        world
            .set_component(id, "transform", toml::Value::Table(data))
            .unwrap();

        let t = world.get_transform(id).unwrap();
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn world_position_follows_parent() {
        let mut world = EmberWorld::new();
        let parent = world.spawn("parent").unwrap();
        let child = world.spawn("child").unwrap();

        let parent_t = toml::toml! {
            position = [10.0, 0.0, 0.0]
        };
        let child_t = toml::toml! {
            position = [1.0, 0.0, 0.0]
        };
        world
            .set_component(parent, "transform", toml::Value::Table(parent_t))
            .unwrap();
        world
            .set_component(child, "transform", toml::Value::Table(child_t))
            .unwrap();
        world.set_parent(child, parent).unwrap();

        let pos = world.get_world_position(child).unwrap();
        assert!((pos.x - 11.0).abs() < 1e-5);
    }
}
