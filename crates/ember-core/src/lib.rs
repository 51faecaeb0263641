//! Ember Core - Foundational types for the Ember engine
//!
//! This crate provides the types every other Ember crate depends on:
//! - `EntityId` - Stable entity identifiers
//! - `Vec3`, `Quat`, `Transform`, `Color` - Spatial and colour types
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{EmberError, Result};
pub use id::EntityId;
pub use types::{Color, Quat, Transform, Vec3};
