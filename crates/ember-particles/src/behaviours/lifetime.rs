//! Emitter lifetime behaviours: decide when the whole emitter stops

use crate::behaviour::{json_f32, LifetimeBehaviour};
use crate::container::ParticleContainer;
use serde_json::{json, Value};

/// Stops the emitter once all of its particles are gone
#[derive(Default)]
pub struct KillOnZeroParticles;

impl LifetimeBehaviour for KillOnZeroParticles {
    fn name(&self) -> &'static str {
        "Kill On Zero Particles"
    }

    fn make_new(&self) -> Box<dyn LifetimeBehaviour> {
        Box::new(KillOnZeroParticles)
    }

    fn should_stop(
        &self,
        emitter_age: f64,
        _delta_time: f32,
        particles: &ParticleContainer,
    ) -> bool {
        // Never stop on the first update, which allows a frame-0 burst
        emitter_age > 0.0 && particles.alive_particles() == 0
    }
}

/// Stops the emitter after a fixed duration
pub struct StopAfterDuration {
    pub duration: f32,
}

impl Default for StopAfterDuration {
    fn default() -> Self {
        Self { duration: 1.0 }
    }
}

impl LifetimeBehaviour for StopAfterDuration {
    fn name(&self) -> &'static str {
        "Stop After Duration"
    }

    fn make_new(&self) -> Box<dyn LifetimeBehaviour> {
        Box::new(StopAfterDuration::default())
    }

    fn should_stop(
        &self,
        emitter_age: f64,
        _delta_time: f32,
        _particles: &ParticleContainer,
    ) -> bool {
        emitter_age >= self.duration as f64
    }

    fn save(&self) -> Value {
        json!({
            "Duration": self.duration,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.duration = json_f32(doc, "Duration", 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_particles_waits_for_first_update() {
        let b = KillOnZeroParticles;
        let particles = ParticleContainer::new(8);

        assert!(!b.should_stop(0.0, 0.016, &particles));
        assert!(b.should_stop(0.016, 0.016, &particles));
    }

    #[test]
    fn zero_particles_keeps_running_while_alive() {
        let b = KillOnZeroParticles;
        let mut particles = ParticleContainer::new(8);
        particles.wake(1, 0.0);

        assert!(!b.should_stop(1.0, 0.016, &particles));
    }

    #[test]
    fn duration_stop_triggers_at_age() {
        let b = StopAfterDuration { duration: 0.5 };
        let particles = ParticleContainer::new(8);

        assert!(!b.should_stop(0.25, 0.016, &particles));
        assert!(b.should_stop(0.5, 0.016, &particles));
    }
}
