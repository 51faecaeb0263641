//! Struct-of-arrays particle pool for one emitter instance

use crate::buffer::ParticleBuffer;
use crate::id::EmitterId;
use ember_core::{Color, Vec3};

/// Parallel per-particle channels sharing one capacity and one alive count.
///
/// Index `i` refers to the same logical particle in every channel; `wake`
/// and `kill` are applied to every channel identically so the channels can
/// never skew. A particle's identity IS its slot index, and indices are
/// invalidated by any kill (swap-with-last), so behaviours only ever work
/// with ranges and counts, never stored handles.
pub struct ParticleContainer {
    max_particles: u32,
    living_particles: u32,

    positions: ParticleBuffer<Vec3>,
    velocities: ParticleBuffer<Vec3>,
    colours: ParticleBuffer<Color>,
    lifetimes: ParticleBuffer<f32>,
    spawn_times: ParticleBuffer<f64>,
    emitter_ids: ParticleBuffer<EmitterId>,
}

impl ParticleContainer {
    pub fn new(max_particles: u32) -> Self {
        Self {
            max_particles,
            living_particles: 0,
            positions: ParticleBuffer::new(max_particles),
            velocities: ParticleBuffer::new(max_particles),
            colours: ParticleBuffer::new(max_particles),
            lifetimes: ParticleBuffer::new(max_particles),
            spawn_times: ParticleBuffer::new(max_particles),
            emitter_ids: ParticleBuffer::new(max_particles),
        }
    }

    pub fn max_particles(&self) -> u32 {
        self.max_particles
    }

    pub fn alive_particles(&self) -> u32 {
        self.living_particles
    }

    /// Bytes of channel data per particle
    pub fn particle_size_bytes(&self) -> usize {
        std::mem::size_of::<Vec3>() * 2
            + std::mem::size_of::<Color>()
            + std::mem::size_of::<f32>()
            + std::mem::size_of::<f64>()
            + std::mem::size_of::<EmitterId>()
    }

    pub fn positions(&self) -> &ParticleBuffer<Vec3> {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut ParticleBuffer<Vec3> {
        &mut self.positions
    }

    pub fn velocities(&self) -> &ParticleBuffer<Vec3> {
        &self.velocities
    }

    pub fn velocities_mut(&mut self) -> &mut ParticleBuffer<Vec3> {
        &mut self.velocities
    }

    pub fn colours(&self) -> &ParticleBuffer<Color> {
        &self.colours
    }

    pub fn colours_mut(&mut self) -> &mut ParticleBuffer<Color> {
        &mut self.colours
    }

    pub fn lifetimes(&self) -> &ParticleBuffer<f32> {
        &self.lifetimes
    }

    pub fn lifetimes_mut(&mut self) -> &mut ParticleBuffer<f32> {
        &mut self.lifetimes
    }

    pub fn spawn_times(&self) -> &ParticleBuffer<f64> {
        &self.spawn_times
    }

    pub fn emitter_ids(&self) -> &ParticleBuffer<EmitterId> {
        &self.emitter_ids
    }

    pub fn emitter_ids_mut(&mut self) -> &mut ParticleBuffer<EmitterId> {
        &mut self.emitter_ids
    }

    /// Wake `count` particles, clamped to remaining capacity, and return the
    /// first new index. Newly woken particles get `spawn_time` in the
    /// spawn-time channel, no attached emitter, and zeroed/default values
    /// elsewhere; generators initialize the rest over `[start, alive)`.
    pub fn wake(&mut self, count: u32, spawn_time: f64) -> u32 {
        let count = count.min(self.max_particles - self.living_particles);
        let first = self.living_particles;
        if count == 0 {
            return first;
        }

        let p = self.positions.wake(count, Some(Vec3::ZERO));
        debug_assert_eq!(p, first);
        let v = self.velocities.wake(count, Some(Vec3::ZERO));
        debug_assert_eq!(v, first);
        let c = self.colours.wake(count, Some(Color::WHITE));
        debug_assert_eq!(c, first);
        let l = self.lifetimes.wake(count, Some(0.0));
        debug_assert_eq!(l, first);
        let s = self.spawn_times.wake(count, Some(spawn_time));
        debug_assert_eq!(s, first);
        let e = self.emitter_ids.wake(count, Some(EmitterId::INVALID));
        debug_assert_eq!(e, first);

        self.living_particles += count;
        first
    }

    /// Kill the particle at `index` across every channel.
    ///
    /// Swap-based: the former last particle moves into `index`. Callers
    /// iterating while killing must re-check the same index afterwards and
    /// must not kill the same logical slot twice in one pass.
    pub fn kill(&mut self, index: u32) {
        debug_assert!(index < self.max_particles);
        if index < self.living_particles {
            self.positions.kill(index);
            self.velocities.kill(index);
            self.colours.kill(index);
            self.lifetimes.kill(index);
            self.spawn_times.kill(index);
            self.emitter_ids.kill(index);

            self.living_particles -= 1;
        }
    }
}
