//! Headless authoring surface for emitter descriptors
//!
//! The visual editor drives descriptors through this type: instantiate
//! behaviours from the registry's prototypes, tweak parameters, save the
//! `.emit` file, and nudge a running system to reload it. Everything here
//! stays a caller of the particle system's public contract.

use crate::behaviour::{BehaviourKind, BehaviourRegistry};
use crate::descriptor::EmitterDescriptor;
use crate::system::ParticleSystem;
use ember_core::{EmberError, Result};
use serde_json::Value;

/// One descriptor being edited, bound to its target file path
pub struct EmitterEditor {
    path: String,
    descriptor: EmitterDescriptor,
}

impl EmitterEditor {
    /// Start editing a blank descriptor for `path`
    pub fn create(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            descriptor: EmitterDescriptor::new(name),
        }
    }

    /// Open an existing `.emit` file for editing
    pub fn open(path: impl Into<String>, registry: &BehaviourRegistry) -> Result<Self> {
        let path = path.into();
        let descriptor = EmitterDescriptor::load_from_file(&path, registry)?;
        Ok(Self { path, descriptor })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn descriptor(&self) -> &EmitterDescriptor {
        &self.descriptor
    }

    pub fn descriptor_mut(&mut self) -> &mut EmitterDescriptor {
        &mut self.descriptor
    }

    /// Append a fresh behaviour instantiated from the registry prototype
    pub fn add_behaviour(
        &mut self,
        registry: &BehaviourRegistry,
        kind: BehaviourKind,
        tag: &str,
    ) -> Result<()> {
        let missing = || EmberError::UnknownBehaviour {
            kind: format!("{kind:?}"),
            tag: tag.to_string(),
        };
        match kind {
            BehaviourKind::Emission => {
                let behaviour = registry.create_emission(tag).ok_or_else(missing)?;
                self.descriptor.add_emission(behaviour);
            }
            BehaviourKind::Generator => {
                let behaviour = registry.create_generator(tag).ok_or_else(missing)?;
                self.descriptor.add_generator(behaviour);
            }
            BehaviourKind::Update => {
                let behaviour = registry.create_update(tag).ok_or_else(missing)?;
                self.descriptor.add_update(behaviour);
            }
            BehaviourKind::Render => {
                let behaviour = registry.create_render(tag).ok_or_else(missing)?;
                self.descriptor.add_render(behaviour);
            }
            BehaviourKind::Lifetime => {
                let behaviour = registry.create_lifetime(tag).ok_or_else(missing)?;
                self.descriptor.add_lifetime(behaviour);
            }
        }
        Ok(())
    }

    pub fn behaviour_count(&self, kind: BehaviourKind) -> usize {
        match kind {
            BehaviourKind::Emission => self.descriptor.emission_behaviours().len(),
            BehaviourKind::Generator => self.descriptor.generators().len(),
            BehaviourKind::Update => self.descriptor.updaters().len(),
            BehaviourKind::Render => self.descriptor.renderers().len(),
            BehaviourKind::Lifetime => self.descriptor.lifetime_behaviours().len(),
        }
    }

    /// Remove the behaviour at `index` from one capability list
    pub fn remove_behaviour(&mut self, kind: BehaviourKind, index: usize) -> Result<()> {
        if index >= self.behaviour_count(kind) {
            return Err(EmberError::EmitterError(format!(
                "no {kind:?} behaviour at index {index}"
            )));
        }
        match kind {
            BehaviourKind::Emission => {
                self.descriptor.emission_mut().remove(index);
            }
            BehaviourKind::Generator => {
                self.descriptor.generators_mut().remove(index);
            }
            BehaviourKind::Update => {
                self.descriptor.updaters_mut().remove(index);
            }
            BehaviourKind::Render => {
                self.descriptor.renderers_mut().remove(index);
            }
            BehaviourKind::Lifetime => {
                self.descriptor.lifetimes_mut().remove(index);
            }
        }
        Ok(())
    }

    /// Set one parameter on the behaviour at `index`, going through its
    /// structured serialization (the same path the inspector UI uses)
    pub fn set_param(
        &mut self,
        kind: BehaviourKind,
        index: usize,
        key: &str,
        value: Value,
    ) -> Result<()> {
        if index >= self.behaviour_count(kind) {
            return Err(EmberError::EmitterError(format!(
                "no {kind:?} behaviour at index {index}"
            )));
        }

        fn patch(doc: Value, key: &str, value: Value) -> Value {
            let mut doc = doc;
            if let Value::Object(fields) = &mut doc {
                fields.insert(key.to_string(), value);
            }
            doc
        }

        match kind {
            BehaviourKind::Emission => {
                let behaviour = &mut self.descriptor.emission_mut()[index];
                let doc = patch(behaviour.save(), key, value);
                behaviour.load(&doc);
            }
            BehaviourKind::Generator => {
                let behaviour = &mut self.descriptor.generators_mut()[index];
                let doc = patch(behaviour.save(), key, value);
                behaviour.load(&doc);
            }
            BehaviourKind::Update => {
                let behaviour = &mut self.descriptor.updaters_mut()[index];
                let doc = patch(behaviour.save(), key, value);
                behaviour.load(&doc);
            }
            BehaviourKind::Render => {
                let behaviour = &mut self.descriptor.renderers_mut()[index];
                let doc = patch(behaviour.save(), key, value);
                behaviour.load(&doc);
            }
            BehaviourKind::Lifetime => {
                let behaviour = &mut self.descriptor.lifetimes_mut()[index];
                let doc = patch(behaviour.save(), key, value);
                behaviour.load(&doc);
            }
        }
        Ok(())
    }

    /// Write the descriptor to its `.emit` file
    pub fn save(&self) -> Result<()> {
        self.descriptor.save_to_file(&self.path)
    }

    /// Save and tell a running system to pick the change up at its next
    /// reconciliation
    pub fn apply(&self, system: &ParticleSystem) -> Result<()> {
        self.save()?;
        system.invalidate_emitter(&self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Quat, Vec3};
    use serde_json::json;

    fn temp_path(tag: &str) -> String {
        std::env::temp_dir()
            .join(format!("ember_editor_test_{}_{tag}.emit", std::process::id()))
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn author_save_open_round_trip() {
        let registry = BehaviourRegistry::with_builtins();
        let path = temp_path("round_trip");

        let mut editor = EmitterEditor::create(&path, "authored");
        editor.descriptor_mut().set_max_particles(32);
        editor
            .add_behaviour(&registry, BehaviourKind::Emission, "Burst Once")
            .unwrap();
        editor
            .set_param(BehaviourKind::Emission, 0, "Emission Count", json!(9))
            .unwrap();
        editor
            .add_behaviour(&registry, BehaviourKind::Generator, "Random Particle Lifetime")
            .unwrap();
        editor
            .add_behaviour(&registry, BehaviourKind::Lifetime, "Kill On Zero Particles")
            .unwrap();
        editor.save().unwrap();

        let reopened = EmitterEditor::open(&path, &registry).unwrap();
        assert_eq!(reopened.descriptor().name(), "authored");
        assert_eq!(reopened.descriptor().max_particles(), 32);
        assert_eq!(reopened.behaviour_count(BehaviourKind::Emission), 1);
        assert_eq!(
            reopened.descriptor().to_json(),
            editor.descriptor().to_json()
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_prototype_is_an_error() {
        let registry = BehaviourRegistry::with_builtins();
        let mut editor = EmitterEditor::create(temp_path("unknown"), "x");
        assert!(editor
            .add_behaviour(&registry, BehaviourKind::Update, "Perpetual Motion")
            .is_err());
    }

    #[test]
    fn remove_behaviour_bounds_checked() {
        let registry = BehaviourRegistry::with_builtins();
        let mut editor = EmitterEditor::create(temp_path("remove"), "x");
        editor
            .add_behaviour(&registry, BehaviourKind::Render, "Point Renderer")
            .unwrap();

        assert!(editor.remove_behaviour(BehaviourKind::Render, 1).is_err());
        editor.remove_behaviour(BehaviourKind::Render, 0).unwrap();
        assert_eq!(editor.behaviour_count(BehaviourKind::Render), 0);
    }

    #[test]
    fn apply_reaches_a_running_system() {
        let path = temp_path("apply");
        let mut system = ParticleSystem::new();
        let registry = system.registry().clone();

        // Author v1 and get it cached by the system
        let mut editor = EmitterEditor::create(&path, "burst");
        editor
            .add_behaviour(&registry, BehaviourKind::Emission, "Burst Once")
            .unwrap();
        editor
            .add_behaviour(&registry, BehaviourKind::Generator, "Random Particle Lifetime")
            .unwrap();
        editor
            .set_param(BehaviourKind::Generator, 0, "MinLife", json!(100.0))
            .unwrap();
        editor
            .set_param(BehaviourKind::Generator, 0, "MaxLife", json!(100.0))
            .unwrap();
        editor.save().unwrap();

        let first = system.start_emitter(&path, Vec3::ZERO, Quat::IDENTITY);
        system.tick(0.25);
        assert_eq!(system.alive_particles(first), Some(1));

        // Bump the burst size and push the edit to the live system
        editor
            .set_param(BehaviourKind::Emission, 0, "Emission Count", json!(4))
            .unwrap();
        editor.apply(&system).unwrap();
        system.tick(0.25);

        let second = system.start_emitter(&path, Vec3::ZERO, Quat::IDENTITY);
        system.tick(0.25);
        assert_eq!(system.alive_particles(second), Some(4));
        std::fs::remove_file(&path).ok();
    }
}
