//! Per-tick draw data collected from render behaviours
//!
//! Render behaviours are read-only over particle data and append primitives
//! here; a renderer consumes the list after the tick. Keeping the sink
//! explicit means no behaviour ever reaches into a global render system.

use ember_core::{Color, Vec3};

/// One camera-facing point sprite
#[derive(Clone, Copy, Debug)]
pub struct DrawPoint {
    pub position: Vec3,
    pub color: Color,
    pub size: f32,
}

/// One debug line segment
#[derive(Clone, Copy, Debug)]
pub struct DrawLine {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Color,
}

/// Primitives produced by one render pass
#[derive(Default)]
pub struct DrawList {
    pub points: Vec<DrawPoint>,
    pub lines: Vec<DrawLine>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }
}
