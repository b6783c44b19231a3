//! Curved, animated connectors between nodes
//!
//! An [`EdgeCurve`] holds only the ids of its endpoints. Every frame it is
//! handed the two live [`NodeEntity`] values and rebuilds a quadratic Bézier
//! from their current positions, so the line tracks node motion with no lag
//! of its own. The dash phase runs on a separate linear accumulator and keeps
//! marching when the nodes are still.

use serde::{Deserialize, Serialize};

use crate::config::EdgeSpec;
use crate::error::{ConfigurationError, SceneResult};
use crate::frame::{EdgeSnapshot, FlowPass, HaloPass};
use crate::math::{self, UP, Vec3};
use crate::node::{Color, NodeEntity, NodeId};

/// Line width used when an edge does not specify one
pub const DEFAULT_LINE_WIDTH: f32 = 1.0;

/// Number of straight segments used to approximate a curve
pub const DEFAULT_SEGMENTS: usize = 20;

/// Visual parameters shared by all edges in a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
    /// Control point lift along +Y, as a fraction of the endpoint distance
    pub arc_height: f32,
    /// Dash phase advance in line units per second
    pub dash_rate: f32,
    pub dash_size: f32,
    pub gap_size: f32,
    /// Divides dash and gap sizes to get world-space lengths
    pub dash_scale: f32,
    pub flow_color: Color,
    pub flow_width: f32,
    pub halo_color: Color,
    pub halo_opacity: f32,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            arc_height: 0.15,
            dash_rate: 10.0,
            dash_size: 1.0,
            gap_size: 20.0,
            dash_scale: 50.0,
            flow_color: Color::rgb(0xFF, 0xFF, 0x00),
            flow_width: 1.0,
            halo_color: Color::rgb(0xF1, 0xC4, 0x0F),
            halo_opacity: 0.3,
        }
    }
}

impl EdgeStyle {
    /// Length after which the dash pattern repeats
    pub fn pattern_length(&self) -> f32 {
        (self.dash_size + self.gap_size) / self.dash_scale
    }
}

/// Quadratic Bézier between two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveGeometry {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl CurveGeometry {
    /// Build the curve, lifting the midpoint by `arc_height` times the chord length
    pub fn between(start: Vec3, end: Vec3, arc_height: f32) -> Self {
        let lift = arc_height * math::distance(start, end);
        let control = math::add(math::midpoint(start, end), math::scale(UP, lift));
        Self {
            start,
            control,
            end,
        }
    }

    /// Point at parameter `t` in [0, 1]
    pub fn point_at(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        let a = math::scale(self.start, u * u);
        let b = math::scale(self.control, 2.0 * u * t);
        let c = math::scale(self.end, t * t);
        math::add(math::add(a, b), c)
    }

    /// `segments + 1` evenly spaced points from start to end
    pub fn tessellate(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| match i {
                0 => self.start,
                i if i == segments => self.end,
                i => self.point_at(i as f32 / segments as f32),
            })
            .collect()
    }
}

/// A renderable connection between two nodes
#[derive(Debug, Clone)]
pub struct EdgeCurve {
    start: NodeId,
    end: NodeId,
    line_width: f32,
    dash_phase: f32,
    style: EdgeStyle,
    dangling_reported: bool,
}

impl EdgeCurve {
    pub fn new(spec: &EdgeSpec, style: EdgeStyle) -> SceneResult<Self> {
        if !(spec.line_width.is_finite() && spec.line_width > 0.0) {
            return Err(ConfigurationError::InvalidLineWidth {
                start: spec.start,
                end: spec.end,
                value: spec.line_width,
            });
        }

        Ok(Self {
            start: spec.start,
            end: spec.end,
            line_width: spec.line_width,
            dash_phase: 0.0,
            style,
            dangling_reported: false,
        })
    }

    pub fn start_id(&self) -> NodeId {
        self.start
    }

    pub fn end_id(&self) -> NodeId {
        self.end
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn dash_phase(&self) -> f32 {
        self.dash_phase
    }

    /// Record that an endpoint is missing; true only the first time
    pub fn mark_dangling(&mut self) -> bool {
        !std::mem::replace(&mut self.dangling_reported, true)
    }

    /// True once a missing endpoint has been reported
    pub fn is_dangling_reported(&self) -> bool {
        self.dangling_reported
    }

    /// Advance the dash pattern by `dt` seconds, wrapping at the pattern length
    pub fn advance_dash(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let period = self.style.pattern_length();
        let phase = self.dash_phase + self.style.dash_rate * dt;
        self.dash_phase = if period > 0.0 {
            phase.rem_euclid(period)
        } else {
            phase
        };
    }

    /// Advance the dash and rebuild the curve from the endpoints' current positions
    pub fn update(&mut self, start: &NodeEntity, end: &NodeEntity, dt: f32) -> EdgeSnapshot {
        self.advance_dash(dt);
        self.snapshot(start.current_position(), end.current_position())
    }

    fn snapshot(&self, start: Vec3, end: Vec3) -> EdgeSnapshot {
        let geometry = CurveGeometry::between(start, end, self.style.arc_height);
        EdgeSnapshot {
            start_id: self.start,
            end_id: self.end,
            geometry,
            line_width: self.line_width,
            dash_phase: self.dash_phase,
            flow: FlowPass {
                color: self.style.flow_color,
                width: self.style.flow_width,
                dash_size: self.style.dash_size,
                gap_size: self.style.gap_size,
                dash_scale: self.style.dash_scale,
            },
            halo: HaloPass {
                color: self.style.halo_color,
                width: self.line_width,
                opacity: self.style.halo_opacity,
            },
        }
    }
}
