//! Scene documents: nodes, edges, views and animation tuning
//!
//! A [`SceneConfig`] is plain data. It can be written by hand in YAML or
//! JSON, loaded with [`SceneConfig::from_path`], and turned into a live
//! [`Scene`](crate::scene::Scene) which performs all validation.
//!
//! [`SceneConfig::dashboard`] is the built-in four-view scene; the same
//! document ships as `scenes/dashboard.yaml`.

use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_6, FRAC_PI_8, PI};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::{DEFAULT_FOLLOW_RATE, DEFAULT_LOOK_AT};
use crate::edge::{DEFAULT_LINE_WIDTH, EdgeStyle};
use crate::error::LoadError;
use crate::frame::DEFAULT_MAX_FRAME_DT;
use crate::math::Vec3;
use crate::node::{Color, DEFAULT_PANEL_OPACITY, NodeId, PanelFlags, PanelSpec, flags};
use crate::spring::SpringConfig;

/// Name of the view a scene starts in unless configured otherwise
pub const DEFAULT_INITIAL_VIEW: &str = "Home";

/// A complete scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    #[serde(default = "default_initial_view")]
    pub initial_view: String,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub edge_style: EdgeStyle,
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    pub views: Vec<ViewSpec>,
}

fn default_initial_view() -> String {
    DEFAULT_INITIAL_VIEW.to_string()
}

/// Motion tuning shared by the whole scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Spring used by every node position
    pub spring: SpringConfig,
    /// Fraction of the remaining camera distance covered per 60 Hz frame
    pub camera_follow_rate: f32,
    /// Orbit pivot reported to the viewport controls
    pub look_at: Vec3,
    /// Longest frame delta fed to the animation, in seconds
    pub max_frame_dt: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::DEFAULT,
            camera_follow_rate: DEFAULT_FOLLOW_RATE,
            look_at: DEFAULT_LOOK_AT,
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
        }
    }
}

/// A node as written in a scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    /// Initial position
    pub position: Vec3,
    pub color: Color,
    pub size: f32,
    #[serde(default, skip_serializing_if = "PanelFlags::is_empty")]
    pub flags: PanelFlags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panels: Vec<PanelSpec>,
}

/// An edge as written in a scene document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub start: NodeId,
    pub end: NodeId,
    #[serde(default = "default_line_width")]
    pub line_width: f32,
}

fn default_line_width() -> f32 {
    DEFAULT_LINE_WIDTH
}

impl EdgeSpec {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: NodeId(start),
            end: NodeId(end),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }
}

/// Fields a view changes on one node. Absent fields keep their last value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "PanelFlags::is_empty")]
    pub flags: PanelFlags,
}

impl NodeOverride {
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            flags: PanelFlags::new(),
        }
    }

    pub fn flag(mut self, name: &str, value: bool) -> Self {
        self.flags.set(name, value);
        self
    }
}

/// A named layout: per-node overrides plus a camera position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub name: String,
    pub camera: Vec3,
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, NodeOverride>,
}

impl ViewSpec {
    pub fn new(name: &str, camera: Vec3) -> Self {
        Self {
            name: name.to_string(),
            camera,
            nodes: BTreeMap::new(),
        }
    }

    pub fn with_node(mut self, id: u32, node: NodeOverride) -> Self {
        self.nodes.insert(NodeId(id), node);
        self
    }
}

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Yaml,
    Json,
}

impl SceneFormat {
    /// Pick the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(LoadError::UnknownExtension(path.display().to_string())),
        }
    }
}

impl SceneConfig {
    /// Load a YAML or JSON scene document
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let format = SceneFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), ?format, "loading scene document");
        match format {
            SceneFormat::Yaml => Self::from_yaml_str(&content),
            SceneFormat::Json => Self::from_json_str(&content),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, LoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The built-in dashboard scene: seven nodes, seven edges and the
    /// Home, List, Detail and Combined views
    pub fn dashboard() -> Self {
        use flags::{
            SHOW_COMBINED as COMBINED, SHOW_DETAIL_PLANE as DETAIL, SHOW_LIST_PLANE as LIST,
        };

        let list_panel = |flag: &str| PanelSpec {
            flag: flag.to_string(),
            size: [4.0, 1.0],
            offset: [-2.7, 0.0, 0.0],
            rotation: [-PI, 0.0, 0.0],
            opacity: DEFAULT_PANEL_OPACITY,
        };
        let combined_panel = |height: f32| PanelSpec {
            flag: flags::SHOW_COMBINED.to_string(),
            size: [2.8, height],
            offset: [-1.8, 0.0, -1.0],
            rotation: [-PI, FRAC_PI_8, 0.0],
            opacity: DEFAULT_PANEL_OPACITY,
        };
        let detail_panel = PanelSpec {
            flag: flags::SHOW_DETAIL_PLANE.to_string(),
            size: [1.6, 2.2],
            offset: [-1.25, -0.3, -0.55],
            rotation: [-PI, FRAC_PI_6, 0.0],
            opacity: DEFAULT_PANEL_OPACITY,
        };
        let node = |id: u32, position: Vec3, color: Color, size: f32, panels: Vec<PanelSpec>| {
            NodeSpec {
                id: NodeId(id),
                position,
                color,
                size,
                flags: PanelFlags::new(),
                panels,
            }
        };

        let mut first = node(
            1,
            [-2.0, 1.0, 3.0],
            Color::rgb(0xED, 0xBB, 0x99),
            0.5,
            vec![list_panel(flags::SHOW_LIST_PLANE), detail_panel],
        );
        first.flags = PanelFlags::new()
            .with(flags::SHOW_LIST_PLANE, false)
            .with(flags::SHOW_DETAIL_PLANE, false);

        let nodes = vec![
            first,
            node(
                2,
                [3.0, 2.0, 0.0],
                Color::rgb(0xA9, 0xDF, 0xBF),
                0.5,
                vec![list_panel(flags::SHOW_LIST_PLANE), combined_panel(1.0)],
            ),
            node(
                3,
                [0.0, 3.0, -3.0],
                Color::rgb(0xD2, 0xB4, 0xDE),
                0.5,
                vec![list_panel(flags::SHOW_LIST_PLANE)],
            ),
            node(
                4,
                [3.5, 1.0, 0.0],
                Color::rgb(0xE6, 0xB0, 0xAA),
                0.3,
                vec![combined_panel(0.5)],
            ),
            node(
                5,
                [4.0, 1.5, 1.0],
                Color::rgb(0xF9, 0xE7, 0x9F),
                0.3,
                vec![combined_panel(0.5)],
            ),
            node(6, [-3.0, 2.0, 3.0], Color::rgb(0xA9, 0xCC, 0xE3), 0.3, vec![]),
            node(7, [4.0, 2.0, 3.0], Color::rgb(0xAB, 0xEB, 0xC6), 0.1, vec![]),
        ];

        let edges = vec![
            EdgeSpec::new(1, 2).with_line_width(3.0),
            EdgeSpec::new(1, 3).with_line_width(2.0),
            EdgeSpec::new(2, 3),
            EdgeSpec::new(1, 6).with_line_width(3.0),
            EdgeSpec::new(2, 4),
            EdgeSpec::new(2, 5),
            EdgeSpec::new(5, 7),
        ];

        let home = view_layout(
            "Home",
            [0.0, 5.0, -10.0],
            [
                ([-2.0, 1.0, 3.0], &[(LIST, false), (DETAIL, false)]),
                ([3.0, 2.0, 0.0], &[(LIST, false), (COMBINED, false)]),
                ([0.0, 3.0, -3.0], &[(LIST, false)]),
                ([3.5, 1.0, 0.0], &[(COMBINED, false)]),
                ([4.0, 1.5, 1.0], &[(COMBINED, false)]),
                ([-3.0, 2.0, 3.0], &[]),
                ([4.0, 2.0, 3.0], &[]),
            ],
        );

        let list = view_layout(
            "List",
            [3.0, 2.5, -12.0],
            [
                ([3.0, 4.0, -4.0], &[(LIST, true), (DETAIL, false)]),
                ([3.0, 2.5, -4.0], &[(LIST, true), (COMBINED, false)]),
                ([3.0, 1.0, -4.0], &[(LIST, true)]),
                ([5.2, 2.0, 0.0], &[(COMBINED, false)]),
                ([6.1, 3.2, 0.0], &[(COMBINED, false)]),
                ([5.3, 5.5, 0.0], &[]),
                ([4.5, 4.0, 1.0], &[]),
            ],
        );

        let detail = view_layout(
            "Detail",
            [3.5, 4.5, -7.0],
            [
                ([3.0, 4.0, -4.0], &[(LIST, false), (DETAIL, true)]),
                ([3.0, 2.5, -4.0], &[(LIST, false), (COMBINED, false)]),
                ([3.0, 1.0, -4.0], &[(LIST, false)]),
                ([5.2, 2.0, 0.0], &[(COMBINED, false)]),
                ([6.1, 3.2, 0.0], &[(COMBINED, false)]),
                ([5.3, 5.5, 0.0], &[]),
                ([4.5, 4.0, 1.0], &[]),
            ],
        );

        let combined = view_layout(
            "Combined",
            [3.5, 2.3, -9.0],
            [
                ([2.0, 7.0, 4.0], &[(LIST, false), (DETAIL, false)]),
                ([3.0, 2.5, -4.0], &[(LIST, false), (COMBINED, true)]),
                ([4.5, 1.0, 3.0], &[(LIST, false)]),
                ([3.0, 1.3, -4.0], &[(COMBINED, true)]),
                ([3.0, 0.5, -4.0], &[(COMBINED, true)]),
                ([4.1, 5.5, 0.0], &[]),
                ([4.5, 4.0, 1.0], &[]),
            ],
        );

        Self {
            name: "dashboard".to_string(),
            initial_view: DEFAULT_INITIAL_VIEW.to_string(),
            animation: AnimationConfig::default(),
            edge_style: EdgeStyle::default(),
            nodes,
            edges,
            views: vec![home, list, detail, combined],
        }
    }
}

/// A view over nodes `1..=7` with a position and flag overrides for each
fn view_layout(name: &str, camera: Vec3, layout: [(Vec3, &[(&str, bool)]); 7]) -> ViewSpec {
    (1..)
        .zip(layout)
        .fold(ViewSpec::new(name, camera), |view, (id, (position, switches))| {
            let node = switches
                .iter()
                .fold(NodeOverride::at(position), |node, &(flag, on)| node.flag(flag, on));
            view.with_node(id, node)
        })
}
