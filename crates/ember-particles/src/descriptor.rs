//! Emitter descriptors: the file-loaded definition of an emitter's behaviours
//!
//! A descriptor is immutable while the simulation runs; running instances
//! share it read-only. The `.emit` document is a JSON object holding scalar
//! parameters plus five arrays of type-tagged behaviour objects.

use crate::behaviour::{
    BehaviourRegistry, EmissionBehaviour, GeneratorBehaviour, LifetimeBehaviour, RenderBehaviour,
    UpdateBehaviour, TYPE_TAG,
};
use ember_core::{EmberError, Result};
use serde_json::{json, Value};
use std::path::Path;

pub const DEFAULT_MAX_PARTICLES: u32 = 256;

/// How an emitter behaves: ordered behaviour lists plus emitter-level
/// parameters. Does not hold any runtime state.
pub struct EmitterDescriptor {
    name: String,
    max_particles: u32,
    owns_child_emitters: bool,
    emission: Vec<Box<dyn EmissionBehaviour>>,
    generators: Vec<Box<dyn GeneratorBehaviour>>,
    updaters: Vec<Box<dyn UpdateBehaviour>>,
    renderers: Vec<Box<dyn RenderBehaviour>>,
    lifetimes: Vec<Box<dyn LifetimeBehaviour>>,
}

impl Default for EmitterDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_particles: DEFAULT_MAX_PARTICLES,
            owns_child_emitters: false,
            emission: Vec::new(),
            generators: Vec::new(),
            updaters: Vec::new(),
            renderers: Vec::new(),
            lifetimes: Vec::new(),
        }
    }
}

impl EmitterDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn max_particles(&self) -> u32 {
        self.max_particles
    }

    pub fn set_max_particles(&mut self, max: u32) {
        self.max_particles = max;
    }

    pub fn owns_child_emitters(&self) -> bool {
        self.owns_child_emitters
    }

    pub fn set_owns_child_emitters(&mut self, owns: bool) {
        self.owns_child_emitters = owns;
    }

    pub fn emission_behaviours(&self) -> &[Box<dyn EmissionBehaviour>] {
        &self.emission
    }

    pub fn generators(&self) -> &[Box<dyn GeneratorBehaviour>] {
        &self.generators
    }

    pub fn updaters(&self) -> &[Box<dyn UpdateBehaviour>] {
        &self.updaters
    }

    pub fn renderers(&self) -> &[Box<dyn RenderBehaviour>] {
        &self.renderers
    }

    pub fn lifetime_behaviours(&self) -> &[Box<dyn LifetimeBehaviour>] {
        &self.lifetimes
    }

    pub fn add_emission(&mut self, behaviour: Box<dyn EmissionBehaviour>) -> &mut Self {
        self.emission.push(behaviour);
        self
    }

    pub fn add_generator(&mut self, behaviour: Box<dyn GeneratorBehaviour>) -> &mut Self {
        self.generators.push(behaviour);
        self
    }

    pub fn add_update(&mut self, behaviour: Box<dyn UpdateBehaviour>) -> &mut Self {
        self.updaters.push(behaviour);
        self
    }

    pub fn add_render(&mut self, behaviour: Box<dyn RenderBehaviour>) -> &mut Self {
        self.renderers.push(behaviour);
        self
    }

    pub fn add_lifetime(&mut self, behaviour: Box<dyn LifetimeBehaviour>) -> &mut Self {
        self.lifetimes.push(behaviour);
        self
    }

    pub fn emission_mut(&mut self) -> &mut Vec<Box<dyn EmissionBehaviour>> {
        &mut self.emission
    }

    pub fn generators_mut(&mut self) -> &mut Vec<Box<dyn GeneratorBehaviour>> {
        &mut self.generators
    }

    pub fn updaters_mut(&mut self) -> &mut Vec<Box<dyn UpdateBehaviour>> {
        &mut self.updaters
    }

    pub fn renderers_mut(&mut self) -> &mut Vec<Box<dyn RenderBehaviour>> {
        &mut self.renderers
    }

    pub fn lifetimes_mut(&mut self) -> &mut Vec<Box<dyn LifetimeBehaviour>> {
        &mut self.lifetimes
    }

    /// Clear every behaviour list and restore default parameters.
    /// Used for in-place reload so shared references stay valid.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Serialize to the `.emit` document format. Behaviours save their
    /// parameters; the type tag that selects the factory on load is stamped
    /// here.
    pub fn to_json(&self) -> Value {
        fn tagged(name: &str, params: Value) -> Value {
            let mut doc = params;
            if let Value::Object(fields) = &mut doc {
                fields.insert(TYPE_TAG.to_string(), Value::String(name.to_string()));
            }
            doc
        }

        json!({
            "Name": self.name,
            "MaxParticles": self.max_particles,
            "OwnsChildEmitters": self.owns_child_emitters,
            "EmissionBehaviours": self
                .emission
                .iter()
                .map(|b| tagged(b.name(), b.save()))
                .collect::<Vec<_>>(),
            "GeneratorBehaviours": self
                .generators
                .iter()
                .map(|b| tagged(b.name(), b.save()))
                .collect::<Vec<_>>(),
            "UpdateBehaviours": self
                .updaters
                .iter()
                .map(|b| tagged(b.name(), b.save()))
                .collect::<Vec<_>>(),
            "RenderBehaviours": self
                .renderers
                .iter()
                .map(|b| tagged(b.name(), b.save()))
                .collect::<Vec<_>>(),
            "LifetimeBehaviours": self
                .lifetimes
                .iter()
                .map(|b| tagged(b.name(), b.save()))
                .collect::<Vec<_>>(),
        })
    }

    /// Deserialize a document into this descriptor in place, reconstructing
    /// behaviours through the registry's type-tagged factories
    pub fn load_json(&mut self, doc: &Value, registry: &BehaviourRegistry) -> Result<()> {
        self.reset();

        self.name = doc
            .get("Name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        self.max_particles = doc
            .get("MaxParticles")
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_MAX_PARTICLES as u64) as u32;
        self.owns_child_emitters = doc
            .get("OwnsChildEmitters")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        for entry in behaviour_array(doc, "EmissionBehaviours")? {
            self.emission.push(registry.load_emission(entry)?);
        }
        for entry in behaviour_array(doc, "GeneratorBehaviours")? {
            self.generators.push(registry.load_generator(entry)?);
        }
        for entry in behaviour_array(doc, "UpdateBehaviours")? {
            self.updaters.push(registry.load_update(entry)?);
        }
        for entry in behaviour_array(doc, "RenderBehaviours")? {
            self.renderers.push(registry.load_render(entry)?);
        }
        for entry in behaviour_array(doc, "LifetimeBehaviours")? {
            self.lifetimes.push(registry.load_lifetime(entry)?);
        }

        Ok(())
    }

    pub fn from_json(doc: &Value, registry: &BehaviourRegistry) -> Result<Self> {
        let mut descriptor = Self::default();
        descriptor.load_json(doc, registry)?;
        Ok(descriptor)
    }

    /// Write the descriptor to a `.emit` file as pretty-printed JSON
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.to_json())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Load a descriptor from a `.emit` file
    pub fn load_from_file(path: impl AsRef<Path>, registry: &BehaviourRegistry) -> Result<Self> {
        let mut descriptor = Self::default();
        descriptor.reload_from_file(path, registry)?;
        Ok(descriptor)
    }

    /// Re-read the file into this descriptor in place
    pub fn reload_from_file(
        &mut self,
        path: impl AsRef<Path>,
        registry: &BehaviourRegistry,
    ) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        let doc: Value = serde_json::from_str(&text)?;
        self.load_json(&doc, registry)
    }
}

fn behaviour_array<'a>(doc: &'a Value, key: &str) -> Result<&'a [Value]> {
    match doc.get(key) {
        None => Ok(&[]),
        Some(Value::Array(entries)) => Ok(entries),
        Some(_) => Err(EmberError::ParseError(format!(
            "{key} must be an array of behaviour objects"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviours::{
        EmitBurstRepeater, EmitOnce, GenerateRandomLifetime, GenerateRandomPosition,
        KillOnZeroParticles, ParticleLifetimeUpdate, PointRenderer,
    };
    use ember_core::Vec3;

    fn sample_descriptor() -> EmitterDescriptor {
        let mut descriptor = EmitterDescriptor::new("sparks");
        descriptor.set_max_particles(128);
        descriptor.set_owns_child_emitters(true);
        descriptor.add_emission(Box::new(EmitOnce { emission_count: 5 }));
        descriptor.add_emission(Box::new(EmitBurstRepeater {
            burst_count: 2,
            frequency: 0.25,
            spawn_duration: 4.0,
        }));
        descriptor.add_generator(Box::new(GenerateRandomPosition {
            bounds_min: Vec3::new(-1.0, 0.0, -1.0),
            bounds_max: Vec3::new(1.0, 0.0, 1.0),
        }));
        descriptor.add_generator(Box::new(GenerateRandomLifetime {
            min_lifetime: 0.5,
            max_lifetime: 1.5,
        }));
        descriptor.add_update(Box::new(ParticleLifetimeUpdate {
            kill_attached_emitters: true,
        }));
        descriptor.add_render(Box::new(PointRenderer { point_size: 0.1 }));
        descriptor.add_lifetime(Box::new(KillOnZeroParticles));
        descriptor
    }

    #[test]
    fn json_round_trip_preserves_order_and_params() {
        let registry = BehaviourRegistry::with_builtins();
        let original = sample_descriptor();

        let doc = original.to_json();
        let loaded = EmitterDescriptor::from_json(&doc, &registry).unwrap();

        assert_eq!(loaded.name(), "sparks");
        assert_eq!(loaded.max_particles(), 128);
        assert!(loaded.owns_child_emitters());
        assert_eq!(loaded.emission_behaviours().len(), 2);
        assert_eq!(loaded.generators().len(), 2);
        assert_eq!(loaded.updaters().len(), 1);
        assert_eq!(loaded.renderers().len(), 1);
        assert_eq!(loaded.lifetime_behaviours().len(), 1);

        // Order and parameters survive: compare re-serialized forms
        assert_eq!(loaded.to_json(), doc);
    }

    #[test]
    fn file_round_trip() {
        let registry = BehaviourRegistry::with_builtins();
        let original = sample_descriptor();

        let path = std::env::temp_dir().join(format!(
            "ember_descriptor_round_trip_{}.emit",
            std::process::id()
        ));
        original.save_to_file(&path).unwrap();
        let loaded = EmitterDescriptor::load_from_file(&path, &registry).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.to_json(), original.to_json());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut descriptor = sample_descriptor();
        descriptor.reset();

        assert_eq!(descriptor.name(), "");
        assert_eq!(descriptor.max_particles(), DEFAULT_MAX_PARTICLES);
        assert!(!descriptor.owns_child_emitters());
        assert!(descriptor.emission_behaviours().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let registry = BehaviourRegistry::with_builtins();
        assert!(EmitterDescriptor::load_from_file("/no/such/file.emit", &registry).is_err());
    }

    #[test]
    fn unknown_behaviour_tag_is_an_error() {
        let registry = BehaviourRegistry::with_builtins();
        let doc = serde_json::json!({
            "Name": "bad",
            "EmissionBehaviours": [{ "Type": "Quantum Foam" }],
        });
        assert!(EmitterDescriptor::from_json(&doc, &registry).is_err());
    }
}
