//! Dynamic component storage

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dynamic components stored as TOML values
///
/// Components are authored in scene files as TOML tables, so no Rust type
/// is required per component. Subsystems read the tables they know about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynamicComponents {
    /// Component data: component_name -> field data
    #[serde(flatten)]
    pub data: HashMap<String, toml::Value>,
}

impl DynamicComponents {
    /// Create empty components
    pub fn new() -> Self {
        Self::default()
    }

    /// Get component data by name
    pub fn get(&self, component: &str) -> Option<&toml::Value> {
        self.data.get(component)
    }

    /// Get mutable component data by name
    pub fn get_mut(&mut self, component: &str) -> Option<&mut toml::Value> {
        self.data.get_mut(component)
    }

    /// Set component data
    pub fn set(&mut self, component: impl Into<String>, data: toml::Value) {
        self.data.insert(component.into(), data);
    }

    /// Remove a component
    pub fn remove(&mut self, component: &str) -> Option<toml::Value> {
        self.data.remove(component)
    }

    /// Check if a component exists
    pub fn has(&self, component: &str) -> bool {
        self.data.contains_key(component)
    }

    /// Get all component names
    pub fn component_names(&self) -> Vec<&str> {
        self.data.keys().map(|s| s.as_str()).collect()
    }

    /// Get a field value from a component
    pub fn get_field(&self, component: &str, field: &str) -> Option<&toml::Value> {
        self.data.get(component).and_then(|v| v.get(field))
    }

    /// Set a field value in a component
    pub fn set_field(&mut self, component: &str, field: &str, value: toml::Value) {
        let comp = self
            .data
            .entry(component.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));

        if let Some(table) = comp.as_table_mut() {
            table.insert(field.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_field() {
        let mut comps = DynamicComponents::new();
        comps.set_field("emitter", "file", toml::Value::String("fire.emit".into()));

        assert!(comps.has("emitter"));
        assert_eq!(
            comps.get_field("emitter", "file").and_then(|v| v.as_str()),
            Some("fire.emit")
        );
    }
}
