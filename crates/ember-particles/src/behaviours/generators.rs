//! Generator behaviours: initialize channel data for newly woken particles

use crate::behaviour::{json_f32, json_string, json_vec3, vec3_to_json, GeneratorBehaviour};
use crate::container::ParticleContainer;
use crate::rand::ParticleRng;
use crate::system::SimulationContext;
use ember_core::{Quat, Vec3};
use serde_json::{json, Value};

/// Positions within an axis-aligned box in emitter space
pub struct GenerateRandomPosition {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl Default for GenerateRandomPosition {
    fn default() -> Self {
        Self {
            bounds_min: Vec3::ZERO,
            bounds_max: Vec3::ZERO,
        }
    }
}

impl GeneratorBehaviour for GenerateRandomPosition {
    fn name(&self) -> &'static str {
        "Random Position"
    }

    fn make_new(&self) -> Box<dyn GeneratorBehaviour> {
        Box::new(GenerateRandomPosition::default())
    }

    fn generate(
        &self,
        emitter_pos: Vec3,
        orientation: Quat,
        _emitter_age: f64,
        _delta_time: f32,
        particles: &mut ParticleContainer,
        start_index: u32,
        end_index: u32,
        rng: &mut ParticleRng,
        _ctx: &SimulationContext,
    ) {
        for i in start_index..end_index {
            let local = rng.vec3_range(self.bounds_min, self.bounds_max);
            particles
                .positions_mut()
                .set(i, emitter_pos + orientation.rotate(local));
        }
    }

    fn save(&self) -> Value {
        json!({
            "BoundsMin": vec3_to_json(self.bounds_min),
            "BoundsMax": vec3_to_json(self.bounds_max),
        })
    }

    fn load(&mut self, doc: &Value) {
        self.bounds_min = json_vec3(doc, "BoundsMin", Vec3::ZERO);
        self.bounds_max = json_vec3(doc, "BoundsMax", Vec3::ZERO);
    }
}

/// Velocities within an axis-aligned box, rotated into emitter space
pub struct GenerateRandomVelocity {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl Default for GenerateRandomVelocity {
    fn default() -> Self {
        Self {
            bounds_min: Vec3::ZERO,
            bounds_max: Vec3::UP,
        }
    }
}

impl GeneratorBehaviour for GenerateRandomVelocity {
    fn name(&self) -> &'static str {
        "Random Velocity"
    }

    fn make_new(&self) -> Box<dyn GeneratorBehaviour> {
        Box::new(GenerateRandomVelocity::default())
    }

    fn generate(
        &self,
        _emitter_pos: Vec3,
        orientation: Quat,
        _emitter_age: f64,
        _delta_time: f32,
        particles: &mut ParticleContainer,
        start_index: u32,
        end_index: u32,
        rng: &mut ParticleRng,
        _ctx: &SimulationContext,
    ) {
        for i in start_index..end_index {
            let local = rng.vec3_range(self.bounds_min, self.bounds_max);
            particles
                .velocities_mut()
                .set(i, orientation.rotate(local));
        }
    }

    fn save(&self) -> Value {
        json!({
            "BoundsMin": vec3_to_json(self.bounds_min),
            "BoundsMax": vec3_to_json(self.bounds_max),
        })
    }

    fn load(&mut self, doc: &Value) {
        self.bounds_min = json_vec3(doc, "BoundsMin", Vec3::ZERO);
        self.bounds_max = json_vec3(doc, "BoundsMax", Vec3::UP);
    }
}

/// Velocities uniformly distributed over the sphere with a speed range
pub struct GenerateRandomVelocitySphere {
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for GenerateRandomVelocitySphere {
    fn default() -> Self {
        Self {
            min_speed: 1.0,
            max_speed: 2.0,
        }
    }
}

impl GeneratorBehaviour for GenerateRandomVelocitySphere {
    fn name(&self) -> &'static str {
        "Random Velocity Sphere"
    }

    fn make_new(&self) -> Box<dyn GeneratorBehaviour> {
        Box::new(GenerateRandomVelocitySphere::default())
    }

    fn generate(
        &self,
        _emitter_pos: Vec3,
        _orientation: Quat,
        _emitter_age: f64,
        _delta_time: f32,
        particles: &mut ParticleContainer,
        start_index: u32,
        end_index: u32,
        rng: &mut ParticleRng,
        _ctx: &SimulationContext,
    ) {
        for i in start_index..end_index {
            let speed = rng.range(self.min_speed, self.max_speed);
            particles.velocities_mut().set(i, rng.direction() * speed);
        }
    }

    fn save(&self) -> Value {
        json!({
            "MinSpeed": self.min_speed,
            "MaxSpeed": self.max_speed,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.min_speed = json_f32(doc, "MinSpeed", 1.0);
        self.max_speed = json_f32(doc, "MaxSpeed", 2.0);
    }
}

/// Lifetimes sampled uniformly from a range
pub struct GenerateRandomLifetime {
    pub min_lifetime: f32,
    pub max_lifetime: f32,
}

impl Default for GenerateRandomLifetime {
    fn default() -> Self {
        Self {
            min_lifetime: 0.0,
            max_lifetime: 1.0,
        }
    }
}

impl GeneratorBehaviour for GenerateRandomLifetime {
    fn name(&self) -> &'static str {
        "Random Particle Lifetime"
    }

    fn make_new(&self) -> Box<dyn GeneratorBehaviour> {
        Box::new(GenerateRandomLifetime::default())
    }

    fn generate(
        &self,
        _emitter_pos: Vec3,
        _orientation: Quat,
        _emitter_age: f64,
        _delta_time: f32,
        particles: &mut ParticleContainer,
        start_index: u32,
        end_index: u32,
        rng: &mut ParticleRng,
        _ctx: &SimulationContext,
    ) {
        for i in start_index..end_index {
            let lifetime = rng.range(self.min_lifetime, self.max_lifetime);
            particles.lifetimes_mut().set(i, lifetime);
        }
    }

    fn save(&self) -> Value {
        json!({
            "MinLife": self.min_lifetime,
            "MaxLife": self.max_lifetime,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.min_lifetime = json_f32(doc, "MinLife", 0.0);
        self.max_lifetime = json_f32(doc, "MaxLife", 1.0);
    }
}

/// Starts a child emitter at each new particle's position and records its id
/// in the attached-emitter channel.
///
/// Must be registered after the position generator: it reads the positions
/// the earlier generator wrote.
#[derive(Default)]
pub struct GenerateSpawnEmitter {
    pub emitter_file: String,
}

impl GeneratorBehaviour for GenerateSpawnEmitter {
    fn name(&self) -> &'static str {
        "Spawn Emitter"
    }

    fn make_new(&self) -> Box<dyn GeneratorBehaviour> {
        Box::new(GenerateSpawnEmitter::default())
    }

    fn generate(
        &self,
        _emitter_pos: Vec3,
        orientation: Quat,
        _emitter_age: f64,
        _delta_time: f32,
        particles: &mut ParticleContainer,
        start_index: u32,
        end_index: u32,
        _rng: &mut ParticleRng,
        ctx: &SimulationContext,
    ) {
        for i in start_index..end_index {
            let pos = particles.positions().get(i);
            let child = ctx.start_emitter(&self.emitter_file, pos, orientation);
            particles.emitter_ids_mut().set(i, child);
        }
    }

    fn save(&self) -> Value {
        json!({
            "EmitterFile": self.emitter_file,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.emitter_file = json_string(doc, "EmitterFile");
    }
}
