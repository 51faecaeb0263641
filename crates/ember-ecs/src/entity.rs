//! Entity information and metadata

use ember_core::EntityId;
use serde::{Deserialize, Serialize};

/// Information about an entity for queries and iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInfo {
    /// The stable entity ID
    pub id: EntityId,
    /// Human-readable name
    pub name: String,
    /// Parent entity name (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Component names present on this entity
    pub components: Vec<String>,
}
