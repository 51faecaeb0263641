//! Update behaviours: per-tick passes over the whole alive range

use crate::behaviour::{
    color_to_json, json_bool, json_color, json_f32, json_string, json_u32, UpdateBehaviour,
};
use crate::container::ParticleContainer;
use crate::system::SimulationContext;
use ember_core::{Color, Quat, Vec3};
use serde_json::{json, Value};

/// Integrates the context's global gravity into particle velocities
#[derive(Default)]
pub struct GravityUpdate;

impl UpdateBehaviour for GravityUpdate {
    fn name(&self) -> &'static str {
        "Gravity"
    }

    fn make_new(&self) -> Box<dyn UpdateBehaviour> {
        Box::new(GravityUpdate)
    }

    fn update(
        &self,
        _emitter_pos: Vec3,
        _orientation: Quat,
        _emitter_age: f64,
        delta_time: f32,
        particles: &mut ParticleContainer,
        ctx: &SimulationContext,
    ) {
        let step = ctx.gravity() * delta_time;
        for v in particles.velocities_mut().alive_mut() {
            *v += step;
        }
    }
}

/// Forward-Euler position integration: pos += vel * dt
#[derive(Default)]
pub struct EulerPositionUpdate;

impl UpdateBehaviour for EulerPositionUpdate {
    fn name(&self) -> &'static str {
        "Euler Position Update"
    }

    fn make_new(&self) -> Box<dyn UpdateBehaviour> {
        Box::new(EulerPositionUpdate)
    }

    fn update(
        &self,
        _emitter_pos: Vec3,
        _orientation: Quat,
        _emitter_age: f64,
        delta_time: f32,
        particles: &mut ParticleContainer,
        _ctx: &SimulationContext,
    ) {
        let end_index = particles.alive_particles();
        for i in 0..end_index {
            let v = particles.velocities().get(i);
            let p = particles.positions().get(i);
            particles.positions_mut().set(i, p + v * delta_time);
        }
    }
}

/// Interpolates particle colour from start to end over each particle's lifetime
pub struct ColourFadeUpdate {
    pub start_colour: Color,
    pub end_colour: Color,
}

impl Default for ColourFadeUpdate {
    fn default() -> Self {
        Self {
            start_colour: Color::WHITE,
            end_colour: Color::new(1.0, 1.0, 1.0, 0.0),
        }
    }
}

impl UpdateBehaviour for ColourFadeUpdate {
    fn name(&self) -> &'static str {
        "Colour Fade"
    }

    fn make_new(&self) -> Box<dyn UpdateBehaviour> {
        Box::new(ColourFadeUpdate::default())
    }

    fn update(
        &self,
        _emitter_pos: Vec3,
        _orientation: Quat,
        emitter_age: f64,
        _delta_time: f32,
        particles: &mut ParticleContainer,
        _ctx: &SimulationContext,
    ) {
        let end_index = particles.alive_particles();
        for i in 0..end_index {
            let lifetime = particles.lifetimes().get(i);
            let age = (emitter_age - particles.spawn_times().get(i)) as f32;
            let t = if lifetime > 0.0 {
                (age / lifetime).clamp(0.0, 1.0)
            } else {
                1.0
            };
            particles
                .colours_mut()
                .set(i, Color::lerp(self.start_colour, self.end_colour, t));
        }
    }

    fn save(&self) -> Value {
        json!({
            "StartColour": color_to_json(self.start_colour),
            "EndColour": color_to_json(self.end_colour),
        })
    }

    fn load(&mut self, doc: &Value) {
        self.start_colour = json_color(doc, "StartColour", Color::WHITE);
        self.end_colour = json_color(doc, "EndColour", Color::new(1.0, 1.0, 1.0, 0.0));
    }
}

/// Kills particles whose age has passed their lifetime, optionally queueing
/// a stop for any child emitter still attached to the dying particle
pub struct ParticleLifetimeUpdate {
    pub kill_attached_emitters: bool,
}

impl Default for ParticleLifetimeUpdate {
    fn default() -> Self {
        Self {
            kill_attached_emitters: false,
        }
    }
}

impl UpdateBehaviour for ParticleLifetimeUpdate {
    fn name(&self) -> &'static str {
        "Particle Lifetime"
    }

    fn make_new(&self) -> Box<dyn UpdateBehaviour> {
        Box::new(ParticleLifetimeUpdate::default())
    }

    fn update(
        &self,
        _emitter_pos: Vec3,
        _orientation: Quat,
        emitter_age: f64,
        _delta_time: f32,
        particles: &mut ParticleContainer,
        ctx: &SimulationContext,
    ) {
        // Forward scan; a kill swaps the last particle into slot i, so i is
        // only advanced when the particle at i survives.
        let mut i = 0;
        while i < particles.alive_particles() {
            let age = (emitter_age - particles.spawn_times().get(i)) as f32;
            let lifetime = particles.lifetimes().get(i);
            if age >= lifetime {
                if self.kill_attached_emitters {
                    let attached = particles.emitter_ids().get(i);
                    if attached.is_valid() {
                        ctx.stop_emitter(attached);
                    }
                }
                particles.kill(i);
            } else {
                i += 1;
            }
        }
    }

    fn save(&self) -> Value {
        json!({
            "KillAttachedEmitters": self.kill_attached_emitters,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.kill_attached_emitters = json_bool(doc, "KillAttachedEmitters", false);
    }
}

/// Keeps attached child emitters following their particle's position
#[derive(Default)]
pub struct AttachedEmitterUpdate;

impl UpdateBehaviour for AttachedEmitterUpdate {
    fn name(&self) -> &'static str {
        "Update Attached Emitter"
    }

    fn make_new(&self) -> Box<dyn UpdateBehaviour> {
        Box::new(AttachedEmitterUpdate)
    }

    fn update(
        &self,
        _emitter_pos: Vec3,
        _orientation: Quat,
        _emitter_age: f64,
        _delta_time: f32,
        particles: &mut ParticleContainer,
        ctx: &SimulationContext,
    ) {
        let end_index = particles.alive_particles();
        for i in 0..end_index {
            let attached = particles.emitter_ids().get(i);
            if attached.is_valid() {
                ctx.set_emitter_transform(attached, particles.positions().get(i), Quat::IDENTITY);
            }
        }
    }
}

/// Starts child emitters from live particles on a repeating schedule,
/// windowed by particle age
pub struct SpawnEmitterUpdate {
    pub emitter_file: String,
    pub attach_to_particle: bool,
    pub burst_count: u32,
    pub frequency: f32,
    pub spawn_start_age: f32,
    /// Negative means repeat forever
    pub spawn_end_age: f32,
}

impl Default for SpawnEmitterUpdate {
    fn default() -> Self {
        Self {
            emitter_file: String::new(),
            attach_to_particle: false,
            burst_count: 1,
            frequency: 0.5,
            spawn_start_age: -1.0,
            spawn_end_age: -1.0,
        }
    }
}

impl UpdateBehaviour for SpawnEmitterUpdate {
    fn name(&self) -> &'static str {
        "Spawn Emitter Repeater"
    }

    fn make_new(&self) -> Box<dyn UpdateBehaviour> {
        Box::new(SpawnEmitterUpdate::default())
    }

    fn update(
        &self,
        _emitter_pos: Vec3,
        orientation: Quat,
        emitter_age: f64,
        delta_time: f32,
        particles: &mut ParticleContainer,
        ctx: &SimulationContext,
    ) {
        if self.frequency <= 0.0 {
            return;
        }
        let end_index = particles.alive_particles();
        for i in 0..end_index {
            let particle_age = emitter_age - particles.spawn_times().get(i);
            if particle_age <= self.spawn_start_age as f64 {
                continue;
            }
            if self.spawn_end_age >= 0.0 && particle_age > self.spawn_end_age as f64 {
                continue;
            }
            let phase = particle_age % self.frequency as f64;
            if phase < delta_time as f64 {
                let pos = particles.positions().get(i);
                for _ in 0..self.burst_count {
                    let child = ctx.start_emitter(&self.emitter_file, pos, orientation);
                    if self.attach_to_particle {
                        particles.emitter_ids_mut().set(i, child);
                    }
                }
            }
        }
    }

    fn save(&self) -> Value {
        json!({
            "EmitterFile": self.emitter_file,
            "AttachToParticle": self.attach_to_particle,
            "EmitterCount": self.burst_count,
            "SpawnFrequency": self.frequency,
            "SpawnStartAge": self.spawn_start_age,
            "SpawnEndAge": self.spawn_end_age,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.emitter_file = json_string(doc, "EmitterFile");
        self.attach_to_particle = json_bool(doc, "AttachToParticle", false);
        self.burst_count = json_u32(doc, "EmitterCount", 1);
        self.frequency = json_f32(doc, "SpawnFrequency", 0.5);
        self.spawn_start_age = json_f32(doc, "SpawnStartAge", -1.0);
        self.spawn_end_age = json_f32(doc, "SpawnEndAge", -1.0);
    }
}
