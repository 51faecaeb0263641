//! Runtime pairing of a descriptor with a particle pool

use crate::container::ParticleContainer;
use crate::descriptor::EmitterDescriptor;
use crate::rand::ParticleRng;
use ember_core::{Quat, Vec3};
use std::sync::{Arc, RwLock};

/// One currently-playing emitter.
///
/// Owns its particle pool; borrows its descriptor from the system's cache
/// (the shared lock is what lets the authoring tool reload a descriptor in
/// place while instances keep their reference).
pub struct EmitterInstance {
    pub descriptor: Arc<RwLock<EmitterDescriptor>>,
    pub particles: ParticleContainer,
    /// Seconds since this emitter started
    pub age: f64,
    pub position: Vec3,
    pub orientation: Quat,
    pub(crate) rng: ParticleRng,
}

impl EmitterInstance {
    pub fn new(
        descriptor: Arc<RwLock<EmitterDescriptor>>,
        position: Vec3,
        orientation: Quat,
        rng_seed: u32,
    ) -> Self {
        let max_particles = descriptor.read().unwrap().max_particles();
        Self {
            descriptor,
            particles: ParticleContainer::new(max_particles),
            age: 0.0,
            position,
            orientation,
            rng: ParticleRng::new(rng_seed),
        }
    }
}
