//! Emission behaviours: decide how many particles spawn each tick

use crate::behaviour::{json_f32, json_u32, EmissionBehaviour};
use serde_json::{json, Value};

/// Emits a fixed burst on the emitter's first update only
pub struct EmitOnce {
    pub emission_count: u32,
}

impl Default for EmitOnce {
    fn default() -> Self {
        Self { emission_count: 1 }
    }
}

impl EmissionBehaviour for EmitOnce {
    fn name(&self) -> &'static str {
        "Burst Once"
    }

    fn make_new(&self) -> Box<dyn EmissionBehaviour> {
        Box::new(EmitOnce::default())
    }

    fn emit(&self, emitter_age: f64, _delta_time: f32) -> u32 {
        if emitter_age <= 0.0 {
            self.emission_count
        } else {
            0
        }
    }

    fn save(&self) -> Value {
        json!({
            "Emission Count": self.emission_count,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.emission_count = json_u32(doc, "Emission Count", 1);
    }
}

/// Emits a burst of particles every `frequency` seconds, optionally only
/// while the emitter is younger than `spawn_duration`
pub struct EmitBurstRepeater {
    pub burst_count: u32,
    pub frequency: f32,
    /// Stop emitting after this age; negative means no limit
    pub spawn_duration: f32,
}

impl Default for EmitBurstRepeater {
    fn default() -> Self {
        Self {
            burst_count: 1,
            frequency: 0.5,
            spawn_duration: -1.0,
        }
    }
}

impl EmissionBehaviour for EmitBurstRepeater {
    fn name(&self) -> &'static str {
        "Burst Repeater"
    }

    fn make_new(&self) -> Box<dyn EmissionBehaviour> {
        Box::new(EmitBurstRepeater::default())
    }

    fn emit(&self, emitter_age: f64, delta_time: f32) -> u32 {
        if self.frequency <= 0.0 {
            return 0;
        }
        if emitter_age < self.frequency as f64 {
            return 0;
        }
        if self.spawn_duration >= 0.0 && emitter_age >= self.spawn_duration as f64 {
            return 0;
        }
        // Stateless period detection: fire on the tick where age wraps past
        // a multiple of the frequency. Requires delta_time < frequency to
        // fire exactly once per period.
        let phase = emitter_age % self.frequency as f64;
        if phase < delta_time as f64 {
            self.burst_count
        } else {
            0
        }
    }

    fn save(&self) -> Value {
        json!({
            "Burst Count": self.burst_count,
            "Frequency": self.frequency,
            "SpawnDuration": self.spawn_duration,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.burst_count = json_u32(doc, "Burst Count", 1);
        self.frequency = json_f32(doc, "Frequency", 0.5);
        self.spawn_duration = json_f32(doc, "SpawnDuration", -1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_once_fires_only_at_age_zero() {
        let b = EmitOnce { emission_count: 5 };
        assert_eq!(b.emit(0.0, 1.0 / 60.0), 5);
        assert_eq!(b.emit(0.016, 1.0 / 60.0), 0);
        assert_eq!(b.emit(10.0, 1.0 / 60.0), 0);
    }

    #[test]
    fn burst_repeater_fires_once_per_period() {
        let b = EmitBurstRepeater {
            burst_count: 3,
            frequency: 0.5,
            spawn_duration: -1.0,
        };
        // dt is an exact binary fraction so period boundaries land exactly
        let dt = 0.125f32;

        let mut total = 0;
        for tick in 0..20 {
            let age = tick as f64 * dt as f64;
            total += b.emit(age, dt);
        }
        // Ages 0.5, 1.0, 1.5, 2.0 fire within the 2.375s simulated (not 0.0)
        assert_eq!(total, 4 * 3);
    }

    #[test]
    fn burst_repeater_respects_spawn_duration() {
        let b = EmitBurstRepeater {
            burst_count: 1,
            frequency: 0.5,
            spawn_duration: 0.75,
        };
        assert_eq!(b.emit(0.5, 0.125), 1);
        assert_eq!(b.emit(1.0, 0.125), 0);
    }

    #[test]
    fn round_trip_parameters() {
        let mut original = EmitBurstRepeater {
            burst_count: 7,
            frequency: 0.25,
            spawn_duration: 3.0,
        };
        let doc = original.save();

        original.burst_count = 0;
        original.load(&doc);
        assert_eq!(original.burst_count, 7);
        assert_eq!(original.frequency, 0.25);
        assert_eq!(original.spawn_duration, 3.0);
    }
}
