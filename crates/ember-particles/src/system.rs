//! The particle system: descriptor cache, emitter lifecycle, tick driver
//!
//! Emitter starts, stops, transform pushes, and descriptor invalidations are
//! all deferred: callers append to mutex-guarded queues and the queues are
//! drained at fixed points in `tick`. That indirection is what makes the
//! parallel update phase safe — a behaviour running inside the fan-out may
//! start or stop emitters, but nothing ever mutates the active registry
//! while it is being iterated.

use crate::behaviour::BehaviourRegistry;
use crate::descriptor::EmitterDescriptor;
use crate::draw::DrawList;
use crate::id::EmitterId;
use crate::instance::EmitterInstance;
use ember_core::{Quat, Vec3};
use ember_runtime::parallel_for;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Registry entry: one running emitter and its public id
pub struct ActiveEmitter {
    pub id: EmitterId,
    pub instance: EmitterInstance,
}

/// State shared with behaviours during the update phase.
///
/// Mutex acquisitions here are short-lived (a push or a map lookup) with one
/// deliberate exception: a descriptor-cache miss loads the file while
/// holding the cache lock, so two concurrent misses for the same path
/// serialize and the loser sees a hit. Queue locks are never held across a
/// behaviour call.
///
/// Lock poisoning is not recovered from: a poisoned queue means a behaviour
/// panicked mid-tick, which already aborts the tick.
pub struct SimulationContext {
    registry: Arc<BehaviourRegistry>,
    loaded: Mutex<HashMap<String, Arc<RwLock<EmitterDescriptor>>>>,
    to_start: Mutex<Vec<ActiveEmitter>>,
    to_stop: Mutex<Vec<EmitterId>>,
    to_move: Mutex<Vec<(EmitterId, Vec3, Quat)>>,
    invalidated: Mutex<Vec<String>>,
    next_id: AtomicU64,
    gravity: Vec3,
}

impl SimulationContext {
    fn new(registry: Arc<BehaviourRegistry>) -> Self {
        Self {
            registry,
            loaded: Mutex::new(HashMap::new()),
            to_start: Mutex::new(Vec::new()),
            to_stop: Mutex::new(Vec::new()),
            to_move: Mutex::new(Vec::new()),
            invalidated: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }

    /// The global gravity vector, polled from world settings each tick
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Queue an emitter start. Returns the new emitter's id, or
    /// [`EmitterId::INVALID`] if the descriptor file cannot be loaded.
    /// The id does not appear in the active registry until the next tick's
    /// reconciliation.
    pub fn start_emitter(&self, path: &str, position: Vec3, orientation: Quat) -> EmitterId {
        let descriptor = {
            let mut loaded = self.loaded.lock().unwrap();
            match loaded.get(path) {
                Some(descriptor) => descriptor.clone(),
                None => match EmitterDescriptor::load_from_file(path, &self.registry) {
                    Ok(descriptor) => {
                        let descriptor = Arc::new(RwLock::new(descriptor));
                        loaded.insert(path.to_string(), descriptor.clone());
                        descriptor
                    }
                    Err(err) => {
                        println!("[particles] Failed to load emitter '{path}': {err}");
                        return EmitterId::INVALID;
                    }
                },
            }
        };

        let id = EmitterId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let seed = (id.raw() as u32) ^ 0x9E37_79B9;
        let instance = EmitterInstance::new(descriptor, position, orientation, seed);
        self.to_start.lock().unwrap().push(ActiveEmitter { id, instance });
        id
    }

    /// Queue an emitter stop. Idempotent; unknown and invalid ids are
    /// dropped at the next reconciliation.
    pub fn stop_emitter(&self, id: EmitterId) {
        if id.is_valid() {
            self.to_stop.lock().unwrap().push(id);
        }
    }

    /// Queue a transform push for a (possibly already expired) emitter.
    /// Applied after the update phase; unknown ids are dropped silently.
    pub fn set_emitter_transform(&self, id: EmitterId, position: Vec3, orientation: Quat) {
        if id.is_valid() {
            self.to_move.lock().unwrap().push((id, position, orientation));
        }
    }

    /// Queue an in-place reload of a cached descriptor (no-op for paths
    /// that were never loaded)
    pub fn invalidate_emitter(&self, path: &str) {
        self.invalidated.lock().unwrap().push(path.to_string());
    }
}

/// Owns every running emitter and drives the per-tick simulation.
///
/// Tick phases, in order:
/// 1. reload invalidated descriptors (in place, shared references stay valid)
/// 2. drain the start queue into the active registry
/// 3. update all active emitters in parallel, then apply queued transforms
/// 4. drain the stop queue (recursively queueing owned children)
/// 5. sequential render pass into the draw list
///
/// A panicking behaviour propagates out of `tick` at the fork-join point and
/// aborts the tick; faults are not contained per emitter.
pub struct ParticleSystem {
    ctx: SimulationContext,
    active: Vec<ActiveEmitter>,
    id_to_index: HashMap<EmitterId, usize>,
    draw_list: DrawList,
    update_enabled: bool,
    render_enabled: bool,
    show_stats: bool,
    max_emitters: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(BehaviourRegistry::with_builtins()))
    }

    pub fn with_registry(registry: Arc<BehaviourRegistry>) -> Self {
        Self {
            ctx: SimulationContext::new(registry),
            active: Vec::new(),
            id_to_index: HashMap::new(),
            draw_list: DrawList::new(),
            update_enabled: true,
            render_enabled: true,
            show_stats: false,
            max_emitters: 64 * 1024,
        }
    }

    pub fn registry(&self) -> &Arc<BehaviourRegistry> {
        &self.ctx.registry
    }

    /// The context behaviours receive during the update phase
    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.ctx.gravity = gravity;
    }

    pub fn set_show_stats(&mut self, show: bool) {
        self.show_stats = show;
    }

    pub fn set_update_enabled(&mut self, enabled: bool) {
        self.update_enabled = enabled;
    }

    pub fn set_render_enabled(&mut self, enabled: bool) {
        self.render_enabled = enabled;
    }

    pub fn set_max_emitters(&mut self, max: usize) {
        self.max_emitters = max;
    }

    /// See [`SimulationContext::start_emitter`]
    pub fn start_emitter(&self, path: &str, position: Vec3, orientation: Quat) -> EmitterId {
        self.ctx.start_emitter(path, position, orientation)
    }

    /// See [`SimulationContext::stop_emitter`]
    pub fn stop_emitter(&self, id: EmitterId) {
        self.ctx.stop_emitter(id);
    }

    /// See [`SimulationContext::invalidate_emitter`]
    pub fn invalidate_emitter(&self, path: &str) {
        self.ctx.invalidate_emitter(path);
    }

    /// Immediately push a transform into a running emitter. Returns false
    /// if the id is not active (common when a child expired naturally).
    pub fn set_emitter_transform(
        &mut self,
        id: EmitterId,
        position: Vec3,
        orientation: Quat,
    ) -> bool {
        let Some(&index) = self.id_to_index.get(&id) else {
            return false;
        };
        let instance = &mut self.active[index].instance;
        instance.position = position;
        instance.orientation = orientation;
        true
    }

    pub fn is_active(&self, id: EmitterId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn instance(&self, id: EmitterId) -> Option<&EmitterInstance> {
        self.id_to_index
            .get(&id)
            .map(|&index| &self.active[index].instance)
    }

    pub fn alive_particles(&self, id: EmitterId) -> Option<u32> {
        self.instance(id).map(|i| i.particles.alive_particles())
    }

    pub fn total_alive_particles(&self) -> u32 {
        self.active
            .iter()
            .map(|em| em.instance.particles.alive_particles())
            .sum()
    }

    /// Primitives produced by the most recent render pass
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Drive one full simulation step
    pub fn tick(&mut self, delta_time: f32) -> bool {
        self.reload_invalidated_emitters();
        self.start_new_emitters();
        if self.update_enabled {
            self.update_emitters(delta_time);
            self.apply_deferred_transforms();
        }
        self.stop_emitters();
        if self.render_enabled {
            self.render_emitters(delta_time);
        }
        if self.show_stats {
            println!(
                "[particles] emitters: {} particles: {}",
                self.active.len(),
                self.total_alive_particles()
            );
        }
        true
    }

    fn reload_invalidated_emitters(&mut self) {
        let paths: Vec<String> = std::mem::take(&mut *self.ctx.invalidated.lock().unwrap());
        if paths.is_empty() {
            return;
        }

        let loaded = self.ctx.loaded.lock().unwrap();
        for path in paths {
            let Some(entry) = loaded.get(&path) else {
                continue;
            };
            // Write locks on descriptors are only ever taken here, between
            // parallel phases, so no update-phase reader can be blocked.
            let mut descriptor = entry.write().unwrap();
            descriptor.reset();
            if let Err(err) = descriptor.reload_from_file(&path, &self.ctx.registry) {
                println!("[particles] Failed to reload emitter '{path}': {err}");
            }
        }
    }

    fn start_new_emitters(&mut self) {
        let pending: Vec<ActiveEmitter> = std::mem::take(&mut *self.ctx.to_start.lock().unwrap());
        for em in pending {
            if self.active.len() >= self.max_emitters {
                println!("[particles] Active emitter cap reached, dropping {}", em.id);
                continue;
            }
            self.id_to_index.insert(em.id, self.active.len());
            self.active.push(em);
        }
    }

    fn update_emitters(&mut self, delta_time: f32) {
        let ctx = &self.ctx;
        parallel_for(&mut self.active, 8, |em| {
            update_active_instance(em, ctx, delta_time);
        });
    }

    fn apply_deferred_transforms(&mut self) {
        let moves: Vec<(EmitterId, Vec3, Quat)> =
            std::mem::take(&mut *self.ctx.to_move.lock().unwrap());
        for (id, position, orientation) in moves {
            if let Some(&index) = self.id_to_index.get(&id) {
                let instance = &mut self.active[index].instance;
                instance.position = position;
                instance.orientation = orientation;
            }
        }
    }

    fn stop_emitters(&mut self) {
        let stops: Vec<EmitterId> = std::mem::take(&mut *self.ctx.to_stop.lock().unwrap());
        for id in stops {
            // Duplicate queue entries fall out here: the first removal takes
            // the id out of the map
            let Some(&index) = self.id_to_index.get(&id) else {
                continue;
            };

            {
                let em = &self.active[index];
                let owns = em.instance.descriptor.read().unwrap().owns_child_emitters();
                if owns {
                    // Queue-stop every still-attached child; they are
                    // removed at the next tick's stop phase
                    let particles = &em.instance.particles;
                    for i in 0..particles.alive_particles() {
                        let child = particles.emitter_ids().get(i);
                        if child.is_valid() {
                            self.ctx.stop_emitter(child);
                        }
                    }
                }
            }

            self.active.swap_remove(index);
            self.id_to_index.remove(&id);
            if index < self.active.len() {
                let moved = self.active[index].id;
                self.id_to_index.insert(moved, index);
            }
        }
    }

    fn render_emitters(&mut self, delta_time: f32) {
        self.draw_list.clear();
        for em in &self.active {
            let descriptor = em.instance.descriptor.read().unwrap();
            for behaviour in descriptor.renderers() {
                behaviour.draw(
                    em.instance.position,
                    em.instance.orientation,
                    em.instance.age,
                    delta_time,
                    &em.instance.particles,
                    &mut self.draw_list,
                );
            }
        }
    }

    #[cfg(test)]
    fn registry_consistent(&self) -> bool {
        self.id_to_index.len() == self.active.len()
            && self
                .id_to_index
                .iter()
                .all(|(id, &index)| self.active[index].id == *id)
    }
}

/// One emitter's full per-tick update: lifetime check, emission, generation,
/// update. Strictly sequential within the instance; instances are updated
/// concurrently and only touch their own state plus the deferred queues.
fn update_active_instance(em: &mut ActiveEmitter, ctx: &SimulationContext, delta_time: f32) {
    let descriptor = em.instance.descriptor.clone();
    let descriptor = descriptor.read().unwrap();
    let instance = &mut em.instance;
    let emitter_age = instance.age;

    for behaviour in descriptor.lifetime_behaviours() {
        if behaviour.should_stop(emitter_age, delta_time, &instance.particles) {
            ctx.stop_emitter(em.id);
            return;
        }
    }

    // Emission pass: sum the requested counts, clamp to remaining capacity
    let requested: u32 = descriptor
        .emission_behaviours()
        .iter()
        .map(|b| b.emit(emitter_age, delta_time))
        .sum();
    let capacity = instance.particles.max_particles() - instance.particles.alive_particles();
    let emission_count = requested.min(capacity);

    if emission_count > 0 {
        let start_index = instance.particles.wake(emission_count, emitter_age);
        let end_index = instance.particles.alive_particles();
        for behaviour in descriptor.generators() {
            behaviour.generate(
                instance.position,
                instance.orientation,
                emitter_age,
                delta_time,
                &mut instance.particles,
                start_index,
                end_index,
                &mut instance.rng,
                ctx,
            );
        }
    }

    // Update pass: runs on all particles; behaviours may kill
    for behaviour in descriptor.updaters() {
        behaviour.update(
            instance.position,
            instance.orientation,
            emitter_age,
            delta_time,
            &mut instance.particles,
            ctx,
        );
    }

    instance.age += delta_time as f64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicU32;

    const DT: f32 = 0.25;

    static FILE_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn write_emit(doc: serde_json::Value) -> PathBuf {
        let n = FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "ember_system_test_{}_{}.emit",
            std::process::id(),
            n
        ));
        std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
        path
    }

    /// A one-shot burst with long-lived particles pinned to the emitter position
    fn burst_doc(count: u32, max_particles: u32) -> serde_json::Value {
        json!({
            "Name": "burst",
            "MaxParticles": max_particles,
            "OwnsChildEmitters": false,
            "EmissionBehaviours": [
                { "Type": "Burst Once", "Emission Count": count }
            ],
            "GeneratorBehaviours": [
                { "Type": "Random Position", "BoundsMin": [0, 0, 0], "BoundsMax": [0, 0, 0] },
                { "Type": "Random Particle Lifetime", "MinLife": 100.0, "MaxLife": 100.0 }
            ],
            "RenderBehaviours": [
                { "Type": "Point Renderer" }
            ]
        })
    }

    fn start(system: &ParticleSystem, path: &PathBuf, position: Vec3) -> EmitterId {
        system.start_emitter(path.to_str().unwrap(), position, Quat::IDENTITY)
    }

    #[test]
    fn basic_lifecycle() {
        let path = write_emit(burst_doc(5, 64));
        let mut system = ParticleSystem::new();

        let id = start(&system, &path, Vec3::new(1.0, 2.0, 3.0));
        assert!(id.is_valid());
        // Queued, not yet reconciled into the registry
        assert!(!system.is_active(id));

        system.tick(DT);

        assert!(system.is_active(id));
        assert_eq!(system.alive_particles(id), Some(5));
        assert!(system.registry_consistent());

        let instance = system.instance(id).unwrap();
        for i in 0..5 {
            let p = instance.particles.positions().get(i);
            assert!((p.x - 1.0).abs() < 1e-5);
            assert!((p.y - 2.0).abs() < 1e-5);
            assert!((p.z - 3.0).abs() < 1e-5);
        }

        // Render pass packed every particle
        assert_eq!(system.draw_list().points.len(), 5);
    }

    #[test]
    fn unloadable_descriptor_returns_invalid_id() {
        let mut system = ParticleSystem::new();
        let id = system.start_emitter("/no/such/emitter.emit", Vec3::ZERO, Quat::IDENTITY);

        assert_eq!(id, EmitterId::INVALID);
        system.tick(DT);
        assert_eq!(system.active_count(), 0);
    }

    #[test]
    fn emission_is_clamped_to_capacity() {
        let path = write_emit(burst_doc(50, 10));
        let mut system = ParticleSystem::new();

        let id = start(&system, &path, Vec3::ZERO);
        system.tick(DT);

        assert_eq!(system.alive_particles(id), Some(10));
    }

    #[test]
    fn capacity_invariant_holds_under_repeated_bursts() {
        let path = write_emit(json!({
            "Name": "repeater",
            "MaxParticles": 16,
            "EmissionBehaviours": [
                { "Type": "Burst Repeater", "Burst Count": 8, "Frequency": 0.25 }
            ],
            "GeneratorBehaviours": [
                { "Type": "Random Particle Lifetime", "MinLife": 100.0, "MaxLife": 100.0 }
            ]
        }));
        let mut system = ParticleSystem::new();
        let id = start(&system, &path, Vec3::ZERO);

        for _ in 0..20 {
            system.tick(DT);
            let alive = system.alive_particles(id).unwrap();
            assert!(alive <= 16);
        }
        assert_eq!(system.alive_particles(id), Some(16));
    }

    #[test]
    fn stop_is_deferred_and_idempotent() {
        let path = write_emit(burst_doc(3, 8));
        let mut system = ParticleSystem::new();

        let id = start(&system, &path, Vec3::ZERO);
        system.tick(DT);
        assert!(system.is_active(id));

        system.stop_emitter(id);
        system.stop_emitter(id);
        system.stop_emitter(id);
        // Still active until the next reconciliation
        assert!(system.is_active(id));

        system.tick(DT);
        assert!(!system.is_active(id));
        assert_eq!(system.active_count(), 0);
        assert!(system.registry_consistent());

        // Stopping an already removed id stays a no-op
        system.stop_emitter(id);
        system.tick(DT);
        assert!(system.registry_consistent());
    }

    #[test]
    fn registry_stays_consistent_under_churn() {
        let path = write_emit(burst_doc(1, 8));
        let mut system = ParticleSystem::new();

        let ids: Vec<EmitterId> = (0..5).map(|_| start(&system, &path, Vec3::ZERO)).collect();
        system.tick(DT);
        assert_eq!(system.active_count(), 5);
        assert!(system.registry_consistent());

        system.stop_emitter(ids[1]);
        system.stop_emitter(ids[3]);
        system.tick(DT);

        assert_eq!(system.active_count(), 3);
        assert!(system.registry_consistent());
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(system.is_active(*id), i != 1 && i != 3);
        }
    }

    #[test]
    fn emitter_removes_itself_after_particles_expire() {
        let path = write_emit(json!({
            "Name": "short_lived",
            "MaxParticles": 4,
            "EmissionBehaviours": [
                { "Type": "Burst Once", "Emission Count": 1 }
            ],
            "GeneratorBehaviours": [
                { "Type": "Random Particle Lifetime", "MinLife": 0.5, "MaxLife": 0.5 }
            ],
            "UpdateBehaviours": [
                { "Type": "Particle Lifetime" }
            ],
            "LifetimeBehaviours": [
                { "Type": "Kill On Zero Particles" }
            ]
        }));
        let mut system = ParticleSystem::new();
        let id = start(&system, &path, Vec3::ZERO);

        // Tick 1 spawns, ticks 2 keeps the particle (age 0.25 < 0.5),
        // tick 3 kills it (age 0.5), tick 4 reaps the emitter
        system.tick(DT);
        assert_eq!(system.alive_particles(id), Some(1));
        system.tick(DT);
        assert_eq!(system.alive_particles(id), Some(1));
        system.tick(DT);
        assert_eq!(system.alive_particles(id), Some(0));
        assert!(system.is_active(id));
        system.tick(DT);
        assert!(!system.is_active(id));
        assert!(system.registry_consistent());
    }

    #[test]
    fn cascading_stop_reaps_children_over_two_reconciliations() {
        let child_path = write_emit(burst_doc(1, 4));
        let parent_path = write_emit(json!({
            "Name": "parent",
            "MaxParticles": 4,
            "OwnsChildEmitters": true,
            "EmissionBehaviours": [
                { "Type": "Burst Once", "Emission Count": 1 }
            ],
            "GeneratorBehaviours": [
                { "Type": "Random Position", "BoundsMin": [0, 0, 0], "BoundsMax": [0, 0, 0] },
                { "Type": "Random Particle Lifetime", "MinLife": 100.0, "MaxLife": 100.0 },
                { "Type": "Spawn Emitter", "EmitterFile": child_path.to_str().unwrap() }
            ]
        }));
        let mut system = ParticleSystem::new();

        let parent = start(&system, &parent_path, Vec3::ZERO);
        system.tick(DT);
        assert!(system.is_active(parent));

        // The generator started a child and recorded its id on the particle
        let child = system
            .instance(parent)
            .unwrap()
            .particles
            .emitter_ids()
            .get(0);
        assert!(child.is_valid());
        assert!(!system.is_active(child));

        system.tick(DT);
        assert!(system.is_active(child));
        assert_eq!(system.active_count(), 2);

        system.stop_emitter(parent);
        system.tick(DT);
        // Parent reaped; its stop queued the child's stop for next tick
        assert!(!system.is_active(parent));
        assert!(system.is_active(child));

        system.tick(DT);
        assert!(!system.is_active(child));
        assert_eq!(system.active_count(), 0);
        assert!(system.registry_consistent());
    }

    #[test]
    fn unknown_ids_are_tolerated() {
        let mut system = ParticleSystem::new();

        assert!(!system.set_emitter_transform(EmitterId(999_999), Vec3::ZERO, Quat::IDENTITY));
        system.stop_emitter(EmitterId(999_999));
        system.tick(DT);
        assert!(system.registry_consistent());
    }

    #[test]
    fn transform_push_moves_running_emitter() {
        let path = write_emit(burst_doc(1, 4));
        let mut system = ParticleSystem::new();

        let id = start(&system, &path, Vec3::ZERO);
        system.tick(DT);

        let moved = system.set_emitter_transform(id, Vec3::new(4.0, 5.0, 6.0), Quat::IDENTITY);
        assert!(moved);
        assert_eq!(
            system.instance(id).unwrap().position,
            Vec3::new(4.0, 5.0, 6.0)
        );
    }

    #[test]
    fn invalidate_reloads_descriptor_in_place() {
        let path = write_emit(burst_doc(5, 64));
        let mut system = ParticleSystem::new();

        let first = start(&system, &path, Vec3::ZERO);
        system.tick(DT);
        assert_eq!(system.alive_particles(first), Some(5));

        // Author saves a new version, then invalidates
        std::fs::write(
            &path,
            serde_json::to_string_pretty(&burst_doc(2, 64)).unwrap(),
        )
        .unwrap();
        system.invalidate_emitter(path.to_str().unwrap());
        system.tick(DT);

        let second = start(&system, &path, Vec3::ZERO);
        system.tick(DT);
        assert_eq!(system.alive_particles(second), Some(2));

        // Both instances share the same cached descriptor object
        let a = &system.instance(first).unwrap().descriptor;
        let b = &system.instance(second).unwrap().descriptor;
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn attached_child_follows_its_particle() {
        let child_path = write_emit(burst_doc(1, 4));
        let parent_path = write_emit(json!({
            "Name": "mover",
            "MaxParticles": 4,
            "EmissionBehaviours": [
                { "Type": "Burst Once", "Emission Count": 1 }
            ],
            "GeneratorBehaviours": [
                { "Type": "Random Position", "BoundsMin": [0, 0, 0], "BoundsMax": [0, 0, 0] },
                { "Type": "Random Velocity", "BoundsMin": [1, 0, 0], "BoundsMax": [1, 0, 0] },
                { "Type": "Random Particle Lifetime", "MinLife": 100.0, "MaxLife": 100.0 },
                { "Type": "Spawn Emitter", "EmitterFile": child_path.to_str().unwrap() }
            ],
            "UpdateBehaviours": [
                { "Type": "Euler Position Update" },
                { "Type": "Update Attached Emitter" }
            ]
        }));
        let mut system = ParticleSystem::new();

        let parent = start(&system, &parent_path, Vec3::ZERO);
        system.tick(DT);
        let child = system
            .instance(parent)
            .unwrap()
            .particles
            .emitter_ids()
            .get(0);
        system.tick(DT);

        let particle_pos = system.instance(parent).unwrap().particles.positions().get(0);
        let child_pos = system.instance(child).unwrap().position;
        assert!((particle_pos.x - 0.5).abs() < 1e-5);
        assert_eq!(child_pos, particle_pos);
    }

    #[test]
    fn gravity_integrates_through_context() {
        let path = write_emit(json!({
            "Name": "faller",
            "MaxParticles": 4,
            "EmissionBehaviours": [
                { "Type": "Burst Once", "Emission Count": 1 }
            ],
            "GeneratorBehaviours": [
                { "Type": "Random Particle Lifetime", "MinLife": 100.0, "MaxLife": 100.0 }
            ],
            "UpdateBehaviours": [
                { "Type": "Gravity" },
                { "Type": "Euler Position Update" }
            ]
        }));
        let mut system = ParticleSystem::new();
        system.set_gravity(Vec3::new(0.0, -10.0, 0.0));

        let id = start(&system, &path, Vec3::ZERO);
        system.tick(0.5);

        let instance = system.instance(id).unwrap();
        assert_eq!(instance.particles.velocities().get(0).y, -5.0);
        assert_eq!(instance.particles.positions().get(0).y, -2.5);
    }
}
