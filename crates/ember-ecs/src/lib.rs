//! Ember ECS - stable-ID entity world with dynamic components
//!
//! Entities carry dynamic TOML-valued components so gameplay data can be
//! authored in scene files without a Rust type per component. Subsystems
//! (physics, particles) read the components they care about by name.

mod component;
mod entity;
mod world;

pub use component::DynamicComponents;
pub use entity::EntityInfo;
pub use world::EmberWorld;
