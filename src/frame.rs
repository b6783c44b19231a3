//! Frame timing and the per-frame snapshot handed to the renderer

use serde::{Deserialize, Serialize};

use crate::edge::CurveGeometry;
use crate::error::{ConfigurationError, SceneResult};
use crate::math::Vec3;
use crate::node::{Color, NodeId, PanelFlags, PanelSpec};

/// Longest frame interval fed to the animation, in seconds
pub const DEFAULT_MAX_FRAME_DT: f32 = 0.1;

/// Sanitises raw frame deltas before they reach springs, dashes and the camera.
///
/// Negative or non-finite deltas become zero; long stalls (a paused tab, a
/// debugger break) are clamped so nothing jumps.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    max_dt: f32,
    frame: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            max_dt: DEFAULT_MAX_FRAME_DT,
            frame: 0,
        }
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> SceneResult<Self> {
        if !(max_dt.is_finite() && max_dt > 0.0) {
            return Err(ConfigurationError::InvalidFrameDt(max_dt));
        }
        Ok(Self { max_dt, frame: 0 })
    }

    /// Count a frame and return its clamped delta
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        self.frame += 1;
        self.clamp(raw_dt)
    }

    pub fn clamp(&self, raw_dt: f32) -> f32 {
        if raw_dt.is_finite() && raw_dt > 0.0 {
            raw_dt.min(self.max_dt)
        } else {
            0.0
        }
    }

    /// Number of frames advanced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}

/// Node state for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub position: Vec3,
    pub target: Vec3,
    pub flags: PanelFlags,
    pub color: Color,
    pub size: f32,
    /// Panels whose flag is set
    pub panels: Vec<PanelSpec>,
}

/// Dashed line drawn along the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowPass {
    pub color: Color,
    pub width: f32,
    pub dash_size: f32,
    pub gap_size: f32,
    pub dash_scale: f32,
}

/// Solid translucent line under the flow pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaloPass {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

/// Edge state for one frame. Both passes are drawn from `geometry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub start_id: NodeId,
    pub end_id: NodeId,
    pub geometry: CurveGeometry,
    pub line_width: f32,
    pub dash_phase: f32,
    pub flow: FlowPass,
    pub halo: HaloPass,
}

impl EdgeSnapshot {
    pub fn start_position(&self) -> Vec3 {
        self.geometry.start
    }

    pub fn end_position(&self) -> Vec3 {
        self.geometry.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub target: Vec3,
    /// Orbit pivot for the external viewport controls
    pub look_at: Vec3,
}

/// An edge skipped this frame because an endpoint is not in the node table.
///
/// An edge missing both endpoints yields one entry per missing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    /// Position of the edge in the edge table
    pub edge_index: usize,
    pub missing: NodeId,
}

/// Everything the renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    /// Clamped delta used for this frame
    pub dt: f32,
    pub active_view: String,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
    pub camera: CameraSnapshot,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dangling: Vec<DanglingReference>,
}

impl FrameSnapshot {
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
