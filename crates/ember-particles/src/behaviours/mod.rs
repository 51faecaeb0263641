//! Built-in behaviour library

pub mod emission;
pub mod generators;
pub mod lifetime;
pub mod render;
pub mod updaters;

pub use emission::{EmitBurstRepeater, EmitOnce};
pub use generators::{
    GenerateRandomLifetime, GenerateRandomPosition, GenerateRandomVelocity,
    GenerateRandomVelocitySphere, GenerateSpawnEmitter,
};
pub use lifetime::{KillOnZeroParticles, StopAfterDuration};
pub use render::{DebugAxisRenderer, PointRenderer};
pub use updaters::{
    AttachedEmitterUpdate, ColourFadeUpdate, EulerPositionUpdate, GravityUpdate,
    ParticleLifetimeUpdate, SpawnEmitterUpdate,
};

use crate::behaviour::BehaviourRegistry;

/// Register every built-in behaviour as a prototype
pub fn register_builtins(registry: &mut BehaviourRegistry) {
    registry.register_emission(Box::new(EmitOnce::default()));
    registry.register_emission(Box::new(EmitBurstRepeater::default()));

    registry.register_generator(Box::new(GenerateRandomPosition::default()));
    registry.register_generator(Box::new(GenerateRandomVelocity::default()));
    registry.register_generator(Box::new(GenerateRandomVelocitySphere::default()));
    registry.register_generator(Box::new(GenerateRandomLifetime::default()));
    registry.register_generator(Box::new(GenerateSpawnEmitter::default()));

    registry.register_update(Box::new(GravityUpdate::default()));
    registry.register_update(Box::new(EulerPositionUpdate::default()));
    registry.register_update(Box::new(ColourFadeUpdate::default()));
    registry.register_update(Box::new(ParticleLifetimeUpdate::default()));
    registry.register_update(Box::new(AttachedEmitterUpdate::default()));
    registry.register_update(Box::new(SpawnEmitterUpdate::default()));

    registry.register_render(Box::new(PointRenderer::default()));
    registry.register_render(Box::new(DebugAxisRenderer::default()));

    registry.register_lifetime(Box::new(KillOnZeroParticles::default()));
    registry.register_lifetime(Box::new(StopAfterDuration::default()));
}
