//! Ember Particles - data-oriented particle simulation
//!
//! Provides pooled per-emitter particle simulation with:
//! - Struct-of-arrays channel buffers with swap-remove O(1) kill
//! - A serializable five-capability behaviour pipeline per emitter
//! - Deferred start/stop/invalidate queues reconciled once per tick
//! - Parallel per-emitter update dispatch
//! - Particles that spawn and follow child emitters of their own

pub mod behaviour;
pub mod behaviours;
pub mod buffer;
pub mod container;
pub mod descriptor;
pub mod draw;
pub mod editor;
pub mod id;
pub mod instance;
pub mod rand;
pub mod sync;
pub mod system;

use ember_core::Result;
use ember_ecs::EmberWorld;
use ember_runtime::RuntimeSystem;

pub use behaviour::{
    BehaviourKind, BehaviourRegistry, EmissionBehaviour, GeneratorBehaviour, LifetimeBehaviour,
    RenderBehaviour, UpdateBehaviour,
};
pub use buffer::ParticleBuffer;
pub use container::ParticleContainer;
pub use descriptor::EmitterDescriptor;
pub use draw::{DrawLine, DrawList, DrawPoint};
pub use editor::EmitterEditor;
pub use id::EmitterId;
pub use instance::EmitterInstance;
pub use sync::EmitterSync;
pub use system::{ParticleSystem, SimulationContext};

/// The particle system wired into the game loop: syncs entity-bound
/// emitters, polls world settings, then drives the core simulation tick.
pub struct ParticleRuntime {
    pub system: ParticleSystem,
    emitter_sync: EmitterSync,
}

impl ParticleRuntime {
    pub fn new() -> Self {
        Self {
            system: ParticleSystem::new(),
            emitter_sync: EmitterSync::new(),
        }
    }
}

impl Default for ParticleRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeSystem for ParticleRuntime {
    fn initialize(&mut self, world: &mut EmberWorld) -> Result<()> {
        self.emitter_sync.sync_from_world(world, &mut self.system);
        let count = self.emitter_sync.emitter_count();
        if count > 0 {
            println!("[particles] Discovered {count} emitter(s)");
        }
        Ok(())
    }

    fn fixed_update(&mut self, _world: &mut EmberWorld, _dt: f64) -> Result<()> {
        // Particles are purely visual — no fixed-step needed
        Ok(())
    }

    fn update(&mut self, world: &mut EmberWorld, dt: f64) -> Result<()> {
        sync::sync_gravity(world, &mut self.system);
        self.emitter_sync.sync_from_world(world, &mut self.system);
        self.system.tick(dt as f32);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "particles"
    }
}
