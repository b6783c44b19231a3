//! Graph vertices: identity, spring-driven position, panel flags

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::NodeSpec;
use crate::error::{ConfigurationError, SceneResult};
use crate::frame::NodeSnapshot;
use crate::math::Vec3;
use crate::spring::{Spring, SpringConfig};

/// Well-known panel flag names
pub mod flags {
    /// Horizontal list row attached beside the node
    pub const SHOW_LIST_PLANE: &str = "show_list_plane";
    /// Detail card with charts
    pub const SHOW_DETAIL_PLANE: &str = "show_detail_plane";
    /// Compact card shown in the combined layout
    pub const SHOW_COMBINED: &str = "show_combined";

    /// Map the camelCase names used by hand-written documents to canonical names
    pub fn canonical(name: &str) -> &str {
        match name {
            "showListPlane" => SHOW_LIST_PLANE,
            "showDetailPlane" => SHOW_DETAIL_PLANE,
            "isShowCombined" | "showCombined" => SHOW_COMBINED,
            other => other,
        }
    }
}

/// Stable node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// RGBA color as normalized floats, written as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);

    /// Opaque color from 8-bit channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`
    pub fn from_hex(hex: &str) -> SceneResult<Self> {
        let invalid = || ConfigurationError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let mut rgba = [1.0; 4];
        for (i, channel) in rgba.iter_mut().enumerate().take(digits.len() / 2) {
            let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            *channel = byte as f32 / 255.0;
        }
        Ok(Self(rgba))
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Named boolean switches gating auxiliary panels.
///
/// Names that were never set read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct PanelFlags(BTreeMap<String, bool>);

impl PanelFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: bool) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: bool) {
        self.0.insert(flags::canonical(name).to_string(), value);
    }

    pub fn get(&self, name: &str) -> bool {
        self.0.get(flags::canonical(name)).copied().unwrap_or(false)
    }

    /// Overwrite the names present in `partial`; every other name keeps its value
    pub fn merge(&mut self, partial: &PanelFlags) {
        for (name, value) in &partial.0 {
            self.0.insert(name.clone(), *value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl From<BTreeMap<String, bool>> for PanelFlags {
    fn from(map: BTreeMap<String, bool>) -> Self {
        let mut flags = PanelFlags::new();
        for (name, value) in map {
            flags.set(&name, value);
        }
        flags
    }
}

impl From<PanelFlags> for BTreeMap<String, bool> {
    fn from(flags: PanelFlags) -> Self {
        flags.0
    }
}

/// An auxiliary panel attached to a node, shown while its flag is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Flag that gates this panel
    pub flag: String,
    /// Width and height
    pub size: [f32; 2],
    /// Offset from the node center
    #[serde(default)]
    pub offset: Vec3,
    /// Euler rotation in radians
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_panel_opacity")]
    pub opacity: f32,
}

/// Opacity of panel backgrounds unless overridden
pub const DEFAULT_PANEL_OPACITY: f32 = 0.8;

fn default_panel_opacity() -> f32 {
    DEFAULT_PANEL_OPACITY
}

/// A live graph vertex
#[derive(Debug, Clone)]
pub struct NodeEntity {
    id: NodeId,
    position: Spring<Vec3>,
    flags: PanelFlags,
    color: Color,
    size: f32,
    panels: Vec<PanelSpec>,
}

impl NodeEntity {
    /// Create a node resting at its initial position
    pub fn new(spec: &NodeSpec, spring: SpringConfig) -> SceneResult<Self> {
        if !(spec.size.is_finite() && spec.size > 0.0) {
            return Err(ConfigurationError::InvalidNodeSize {
                id: spec.id,
                value: spec.size,
            });
        }

        Ok(Self {
            id: spec.id,
            position: Spring::new(spec.position, spring)?,
            flags: spec.flags.clone(),
            color: spec.color,
            size: spec.size,
            panels: spec.panels.clone(),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Start moving toward `position`
    pub fn set_target_position(&mut self, position: Vec3) {
        self.position.retarget(position);
    }

    /// Merge `partial` into the current flags
    pub fn set_flags(&mut self, partial: &PanelFlags) {
        self.flags.merge(partial);
    }

    pub fn current_position(&self) -> Vec3 {
        self.position.value()
    }

    pub fn target_position(&self) -> Vec3 {
        self.position.target()
    }

    pub fn current_flags(&self) -> &PanelFlags {
        &self.flags
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Advance the position spring by `dt` seconds
    pub fn sample(&mut self, dt: f32) -> Vec3 {
        self.position.sample(dt)
    }

    /// Place the node on its target with no animation
    pub fn jump_to_target(&mut self) {
        let target = self.position.target();
        self.position.set_immediate(target);
    }

    /// True when the position has settled on its target
    pub fn is_settled(&self) -> bool {
        self.position.is_at_rest()
    }

    /// Panels whose gating flag is currently set
    pub fn visible_panels(&self) -> impl Iterator<Item = &PanelSpec> {
        self.panels.iter().filter(|panel| self.flags.get(&panel.flag))
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id,
            position: self.current_position(),
            target: self.target_position(),
            flags: self.flags.clone(),
            color: self.color,
            size: self.size,
            panels: self.visible_panels().cloned().collect(),
        }
    }
}
