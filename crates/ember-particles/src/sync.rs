//! Bridges ECS `particle_emitter` components to running emitters
//!
//! An entity opts in with a component naming its `.emit` file:
//!
//! ```toml
//! [components.particle_emitter]
//! emitter = "assets/fire.emit"
//! ```
//!
//! The sync step starts an emitter per component, keeps it following the
//! entity's world transform, restarts it when the path changes or the
//! component sets `restart = true`, and stops it when the entity (or the
//! component) goes away.

use crate::id::EmitterId;
use crate::system::ParticleSystem;
use ember_core::{EntityId, Vec3};
use ember_ecs::EmberWorld;
use std::collections::{HashMap, HashSet};

/// The running emitter bound to one entity
struct PlayingEmitter {
    id: EmitterId,
    path: String,
}

/// Tracks entity -> emitter bindings across ticks
#[derive(Default)]
pub struct EmitterSync {
    playing: HashMap<EntityId, PlayingEmitter>,
}

impl EmitterSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities currently bound to an emitter
    pub fn emitter_count(&self) -> usize {
        self.playing.len()
    }

    /// The emitter id playing for an entity, if any
    pub fn playing_id(&self, entity: EntityId) -> Option<EmitterId> {
        self.playing.get(&entity).map(|entry| entry.id)
    }

    /// Reconcile entity components with running emitters. Starts, restarts,
    /// moves, and stops emitters as entities change; clears each handled
    /// `restart` flag back to false.
    pub fn sync_from_world(&mut self, world: &mut EmberWorld, system: &mut ParticleSystem) {
        let mut seen = HashSet::new();

        for info in world.all_entities() {
            let Some(component) = world.get_component(info.id, "particle_emitter") else {
                continue;
            };
            let Some(path) = component
                .get("emitter")
                .and_then(|v| v.as_str())
                .map(String::from)
            else {
                continue;
            };
            let restart = component
                .get("restart")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

            seen.insert(info.id);
            let transform = world.get_world_transform(info.id).unwrap_or_default();

            let needs_restart = match self.playing.get(&info.id) {
                Some(entry) => restart || entry.path != path,
                None => true,
            };

            if needs_restart {
                if let Some(entry) = self.playing.get(&info.id) {
                    system.stop_emitter(entry.id);
                }
                let id = system.start_emitter(&path, transform.position, transform.rotation);
                self.playing.insert(info.id, PlayingEmitter { id, path });
                if restart {
                    if let Some(components) = world.get_components_mut(info.id) {
                        components.set_field(
                            "particle_emitter",
                            "restart",
                            toml::Value::Boolean(false),
                        );
                    }
                }
            } else if let Some(entry) = self.playing.get(&info.id) {
                // Follow the entity; a stale id (emitter stopped itself) is
                // a harmless no-op here
                system.set_emitter_transform(entry.id, transform.position, transform.rotation);
            }
        }

        // Entities that despawned or dropped the component stop their emitter
        self.playing.retain(|entity, entry| {
            if seen.contains(entity) {
                true
            } else {
                system.stop_emitter(entry.id);
                false
            }
        });
    }
}

/// Poll the world's `environment` component for the global gravity vector
pub fn sync_gravity(world: &EmberWorld, system: &mut ParticleSystem) {
    for info in world.all_entities() {
        let Some(environment) = world.get_component(info.id, "environment") else {
            continue;
        };
        let Some(arr) = environment.get("gravity").and_then(|v| v.as_array()) else {
            continue;
        };
        if arr.len() >= 3 {
            let get = |i: usize| {
                arr[i]
                    .as_float()
                    .or_else(|| arr[i].as_integer().map(|n| n as f64))
                    .unwrap_or(0.0) as f32
            };
            system.set_gravity(Vec3::new(get(0), get(1), get(2)));
            return;
        }
    }
}
