//! Render behaviours: read-only passes that fill the draw list

use crate::behaviour::{json_f32, RenderBehaviour};
use crate::container::ParticleContainer;
use crate::draw::{DrawLine, DrawList, DrawPoint};
use ember_core::{Color, Quat, Vec3};
use serde_json::{json, Value};

/// Packs every alive particle into the draw list as a point sprite
pub struct PointRenderer {
    pub point_size: f32,
}

impl Default for PointRenderer {
    fn default() -> Self {
        Self { point_size: 0.05 }
    }
}

impl RenderBehaviour for PointRenderer {
    fn name(&self) -> &'static str {
        "Point Renderer"
    }

    fn make_new(&self) -> Box<dyn RenderBehaviour> {
        Box::new(PointRenderer::default())
    }

    fn draw(
        &self,
        _emitter_pos: Vec3,
        _orientation: Quat,
        _emitter_age: f64,
        _delta_time: f32,
        particles: &ParticleContainer,
        out: &mut DrawList,
    ) {
        let count = particles.alive_particles();
        out.points.reserve(count as usize);
        for i in 0..count {
            out.points.push(DrawPoint {
                position: particles.positions().get(i),
                color: particles.colours().get(i),
                size: self.point_size,
            });
        }
    }

    fn save(&self) -> Value {
        json!({
            "PointSize": self.point_size,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.point_size = json_f32(doc, "PointSize", 0.05);
    }
}

/// Draws the emitter's local axes as three coloured lines
pub struct DebugAxisRenderer {
    pub axis_length: f32,
}

impl Default for DebugAxisRenderer {
    fn default() -> Self {
        Self { axis_length: 1.0 }
    }
}

impl RenderBehaviour for DebugAxisRenderer {
    fn name(&self) -> &'static str {
        "Debug Axis"
    }

    fn make_new(&self) -> Box<dyn RenderBehaviour> {
        Box::new(DebugAxisRenderer::default())
    }

    fn draw(
        &self,
        emitter_pos: Vec3,
        orientation: Quat,
        _emitter_age: f64,
        _delta_time: f32,
        _particles: &ParticleContainer,
        out: &mut DrawList,
    ) {
        let axes = [
            (Vec3::new(1.0, 0.0, 0.0), Color::RED),
            (Vec3::new(0.0, 1.0, 0.0), Color::GREEN),
            (Vec3::new(0.0, 0.0, 1.0), Color::BLUE),
        ];
        for (axis, color) in axes {
            out.lines.push(DrawLine {
                from: emitter_pos,
                to: emitter_pos + orientation.rotate(axis * self.axis_length),
                color,
            });
        }
    }

    fn save(&self) -> Value {
        json!({
            "AxisLength": self.axis_length,
        })
    }

    fn load(&mut self, doc: &Value) {
        self.axis_length = json_f32(doc, "AxisLength", 1.0);
    }
}
