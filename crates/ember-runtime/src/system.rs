//! Runtime system trait

use ember_core::Result;
use ember_ecs::EmberWorld;

/// A system that can be ticked by the game loop
///
/// Systems are updated in registration order. Fixed update runs at a constant
/// rate (physics), while update runs once per frame (simulation, rendering).
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self, world: &mut EmberWorld) -> Result<()>;

    /// Called at a fixed rate (e.g. 60Hz) for deterministic simulation
    fn fixed_update(&mut self, world: &mut EmberWorld, dt: f64) -> Result<()>;

    /// Called once per frame for variable-rate logic
    fn update(&mut self, world: &mut EmberWorld, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
