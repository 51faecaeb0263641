//! Ember Runtime - game loop plumbing
//!
//! Provides the `RuntimeSystem` trait systems implement to be ticked by the
//! game loop, the fixed-timestep `GameClock`, and the `parallel_for`
//! primitive used for data-parallel system phases.

mod clock;
mod jobs;
mod system;

pub use clock::GameClock;
pub use jobs::{parallel_for, parallel_for_each};
pub use system::RuntimeSystem;
