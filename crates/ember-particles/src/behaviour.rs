//! The five behaviour capability traits and the type-tagged registry
//!
//! An emitter descriptor is an ordered collection of behaviour instances,
//! one list per capability. Behaviours are stateless between ticks (all
//! mutable simulation state lives in the particle container and the
//! instance), which is what lets descriptors be shared read-only across the
//! parallel update phase.
//!
//! Serialization is type-tagged: each behaviour writes its parameters into
//! a JSON object and the registry reconstructs it from the `Type` field via
//! a name-keyed prototype map.

use crate::container::ParticleContainer;
use crate::draw::DrawList;
use crate::rand::ParticleRng;
use crate::system::SimulationContext;
use ember_core::{Color, EmberError, Quat, Result, Vec3};
use serde_json::Value;
use std::collections::HashMap;

/// Key of the type tag in serialized behaviour objects
pub const TYPE_TAG: &str = "Type";

/// Decides how many particles to spawn this tick. No side effects on
/// particle data; multiple emission behaviours on one emitter are additive
/// and the total is clamped to remaining capacity before generators run.
pub trait EmissionBehaviour: Send + Sync {
    fn name(&self) -> &'static str;
    fn make_new(&self) -> Box<dyn EmissionBehaviour>;
    fn emit(&self, emitter_age: f64, delta_time: f32) -> u32;

    fn save(&self) -> Value {
        Value::Object(Default::default())
    }
    fn load(&mut self, _doc: &Value) {}
}

/// Initializes channel data for newly woken particles over the half-open
/// range `[start_index, end_index)`. Generators run in registration order;
/// two generators writing the same channel is a configuration error.
pub trait GeneratorBehaviour: Send + Sync {
    fn name(&self) -> &'static str;
    fn make_new(&self) -> Box<dyn GeneratorBehaviour>;
    #[allow(clippy::too_many_arguments)]
    fn generate(
        &self,
        emitter_pos: Vec3,
        orientation: Quat,
        emitter_age: f64,
        delta_time: f32,
        particles: &mut ParticleContainer,
        start_index: u32,
        end_index: u32,
        rng: &mut ParticleRng,
        ctx: &SimulationContext,
    );

    fn save(&self) -> Value {
        Value::Object(Default::default())
    }
    fn load(&mut self, _doc: &Value) {}
}

/// Operates on the whole alive range each tick and may kill particles.
///
/// Kills are swap-based, so a killing pass must use a forward scan that
/// re-reads `alive_particles()` and does NOT advance past a killed index:
///
/// ```text
/// let mut i = 0;
/// while i < particles.alive_particles() {
///     if should_die(i) { particles.kill(i) } else { i += 1 }
/// }
/// ```
pub trait UpdateBehaviour: Send + Sync {
    fn name(&self) -> &'static str;
    fn make_new(&self) -> Box<dyn UpdateBehaviour>;
    fn update(
        &self,
        emitter_pos: Vec3,
        orientation: Quat,
        emitter_age: f64,
        delta_time: f32,
        particles: &mut ParticleContainer,
        ctx: &SimulationContext,
    );

    fn save(&self) -> Value {
        Value::Object(Default::default())
    }
    fn load(&mut self, _doc: &Value) {}
}

/// Read-only pass over alive particles, appending primitives to the
/// frame's draw list. Runs after all emitters have updated.
pub trait RenderBehaviour: Send + Sync {
    fn name(&self) -> &'static str;
    fn make_new(&self) -> Box<dyn RenderBehaviour>;
    fn draw(
        &self,
        emitter_pos: Vec3,
        orientation: Quat,
        emitter_age: f64,
        delta_time: f32,
        particles: &ParticleContainer,
        out: &mut DrawList,
    );

    fn save(&self) -> Value {
        Value::Object(Default::default())
    }
    fn load(&mut self, _doc: &Value) {}
}

/// Decides whether the whole emitter should stop. Checked before emission;
/// any true result stops the emitter this tick without running its other
/// behaviours.
pub trait LifetimeBehaviour: Send + Sync {
    fn name(&self) -> &'static str;
    fn make_new(&self) -> Box<dyn LifetimeBehaviour>;
    fn should_stop(&self, emitter_age: f64, delta_time: f32, particles: &ParticleContainer)
        -> bool;

    fn save(&self) -> Value {
        Value::Object(Default::default())
    }
    fn load(&mut self, _doc: &Value) {}
}

/// The five behaviour capabilities
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BehaviourKind {
    Emission,
    Generator,
    Update,
    Render,
    Lifetime,
}

/// Name-keyed prototype map used to instantiate behaviours from their
/// serialized type tag, and by the authoring tool to create fresh default
/// instances.
#[derive(Default)]
pub struct BehaviourRegistry {
    emission: HashMap<&'static str, Box<dyn EmissionBehaviour>>,
    generators: HashMap<&'static str, Box<dyn GeneratorBehaviour>>,
    updaters: HashMap<&'static str, Box<dyn UpdateBehaviour>>,
    renderers: HashMap<&'static str, Box<dyn RenderBehaviour>>,
    lifetimes: HashMap<&'static str, Box<dyn LifetimeBehaviour>>,
}

impl BehaviourRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in behaviour registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::behaviours::register_builtins(&mut registry);
        registry
    }

    pub fn register_emission(&mut self, proto: Box<dyn EmissionBehaviour>) {
        self.emission.insert(proto.name(), proto);
    }

    pub fn register_generator(&mut self, proto: Box<dyn GeneratorBehaviour>) {
        self.generators.insert(proto.name(), proto);
    }

    pub fn register_update(&mut self, proto: Box<dyn UpdateBehaviour>) {
        self.updaters.insert(proto.name(), proto);
    }

    pub fn register_render(&mut self, proto: Box<dyn RenderBehaviour>) {
        self.renderers.insert(proto.name(), proto);
    }

    pub fn register_lifetime(&mut self, proto: Box<dyn LifetimeBehaviour>) {
        self.lifetimes.insert(proto.name(), proto);
    }

    /// Registered type names for one capability, sorted for stable display
    pub fn names(&self, kind: BehaviourKind) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = match kind {
            BehaviourKind::Emission => self.emission.keys().copied().collect(),
            BehaviourKind::Generator => self.generators.keys().copied().collect(),
            BehaviourKind::Update => self.updaters.keys().copied().collect(),
            BehaviourKind::Render => self.renderers.keys().copied().collect(),
            BehaviourKind::Lifetime => self.lifetimes.keys().copied().collect(),
        };
        names.sort_unstable();
        names
    }

    pub fn create_emission(&self, tag: &str) -> Option<Box<dyn EmissionBehaviour>> {
        self.emission.get(tag).map(|proto| proto.make_new())
    }

    pub fn create_generator(&self, tag: &str) -> Option<Box<dyn GeneratorBehaviour>> {
        self.generators.get(tag).map(|proto| proto.make_new())
    }

    pub fn create_update(&self, tag: &str) -> Option<Box<dyn UpdateBehaviour>> {
        self.updaters.get(tag).map(|proto| proto.make_new())
    }

    pub fn create_render(&self, tag: &str) -> Option<Box<dyn RenderBehaviour>> {
        self.renderers.get(tag).map(|proto| proto.make_new())
    }

    pub fn create_lifetime(&self, tag: &str) -> Option<Box<dyn LifetimeBehaviour>> {
        self.lifetimes.get(tag).map(|proto| proto.make_new())
    }

    pub fn load_emission(&self, doc: &Value) -> Result<Box<dyn EmissionBehaviour>> {
        let tag = type_tag(doc)?;
        let mut behaviour = self
            .create_emission(tag)
            .ok_or_else(|| unknown(BehaviourKind::Emission, tag))?;
        behaviour.load(doc);
        Ok(behaviour)
    }

    pub fn load_generator(&self, doc: &Value) -> Result<Box<dyn GeneratorBehaviour>> {
        let tag = type_tag(doc)?;
        let mut behaviour = self
            .create_generator(tag)
            .ok_or_else(|| unknown(BehaviourKind::Generator, tag))?;
        behaviour.load(doc);
        Ok(behaviour)
    }

    pub fn load_update(&self, doc: &Value) -> Result<Box<dyn UpdateBehaviour>> {
        let tag = type_tag(doc)?;
        let mut behaviour = self
            .create_update(tag)
            .ok_or_else(|| unknown(BehaviourKind::Update, tag))?;
        behaviour.load(doc);
        Ok(behaviour)
    }

    pub fn load_render(&self, doc: &Value) -> Result<Box<dyn RenderBehaviour>> {
        let tag = type_tag(doc)?;
        let mut behaviour = self
            .create_render(tag)
            .ok_or_else(|| unknown(BehaviourKind::Render, tag))?;
        behaviour.load(doc);
        Ok(behaviour)
    }

    pub fn load_lifetime(&self, doc: &Value) -> Result<Box<dyn LifetimeBehaviour>> {
        let tag = type_tag(doc)?;
        let mut behaviour = self
            .create_lifetime(tag)
            .ok_or_else(|| unknown(BehaviourKind::Lifetime, tag))?;
        behaviour.load(doc);
        Ok(behaviour)
    }
}

fn type_tag(doc: &Value) -> Result<&str> {
    doc.get(TYPE_TAG)
        .and_then(|v| v.as_str())
        .ok_or_else(|| EmberError::ParseError("behaviour object missing Type tag".into()))
}

fn unknown(kind: BehaviourKind, tag: &str) -> EmberError {
    EmberError::UnknownBehaviour {
        kind: format!("{kind:?}"),
        tag: tag.to_string(),
    }
}

// ── JSON field helpers (handle integer/float coercion, missing fields) ──

pub(crate) fn json_f32(doc: &Value, key: &str, default: f32) -> f32 {
    doc.get(key).and_then(|v| v.as_f64()).unwrap_or(default as f64) as f32
}

pub(crate) fn json_u32(doc: &Value, key: &str, default: u32) -> u32 {
    doc.get(key)
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f as u64)))
        .unwrap_or(default as u64) as u32
}

pub(crate) fn json_bool(doc: &Value, key: &str, default: bool) -> bool {
    doc.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

pub(crate) fn json_string(doc: &Value, key: &str) -> String {
    doc.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn json_vec3(doc: &Value, key: &str, default: Vec3) -> Vec3 {
    let Some(arr) = doc.get(key).and_then(|v| v.as_array()) else {
        return default;
    };
    if arr.len() < 3 {
        return default;
    }
    let get = |i: usize, d: f32| arr[i].as_f64().unwrap_or(d as f64) as f32;
    Vec3::new(get(0, default.x), get(1, default.y), get(2, default.z))
}

pub(crate) fn json_color(doc: &Value, key: &str, default: Color) -> Color {
    let Some(arr) = doc.get(key).and_then(|v| v.as_array()) else {
        return default;
    };
    if arr.len() < 4 {
        return default;
    }
    let arr4 = [
        arr[0].as_f64().unwrap_or(default.r as f64) as f32,
        arr[1].as_f64().unwrap_or(default.g as f64) as f32,
        arr[2].as_f64().unwrap_or(default.b as f64) as f32,
        arr[3].as_f64().unwrap_or(default.a as f64) as f32,
    ];
    Color::from_array(arr4)
}

pub(crate) fn vec3_to_json(v: Vec3) -> Value {
    serde_json::json!([v.x, v.y, v.z])
}

pub(crate) fn color_to_json(c: Color) -> Value {
    serde_json::json!([c.r, c.g, c.b, c.a])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_helpers_coerce_and_default() {
        let doc = serde_json::json!({
            "Frequency": 2,
            "Flag": true,
            "Bounds": [1.0, 2, 3.5],
        });

        assert_eq!(json_f32(&doc, "Frequency", 0.0), 2.0);
        assert_eq!(json_f32(&doc, "Missing", 7.5), 7.5);
        assert!(json_bool(&doc, "Flag", false));
        assert_eq!(
            json_vec3(&doc, "Bounds", Vec3::ZERO),
            Vec3::new(1.0, 2.0, 3.5)
        );
        assert_eq!(json_vec3(&doc, "Missing", Vec3::ONE), Vec3::ONE);
    }

    #[test]
    fn registry_rejects_unknown_tag() {
        let registry = BehaviourRegistry::with_builtins();
        let doc = serde_json::json!({ "Type": "No Such Behaviour" });
        assert!(registry.load_emission(&doc).is_err());
    }
}
