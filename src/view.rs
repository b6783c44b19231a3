//! Named layouts and the user actions that select them

use std::collections::HashMap;
use std::fmt;

use crate::config::{NodeOverride, ViewSpec};
use crate::error::{ConfigurationError, SceneResult};
use crate::math::Vec3;
use crate::node::NodeId;

/// A view with its overrides resolved to node-table indices.
///
/// Resolution happens once, when the scene is built, so applying a view can
/// never fail halfway through.
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    camera: Vec3,
    overrides: Vec<(usize, NodeOverride)>,
}

impl View {
    /// Resolve `spec` against the node table index
    pub fn resolve(spec: &ViewSpec, index: &HashMap<NodeId, usize>) -> SceneResult<Self> {
        let overrides = spec
            .nodes
            .iter()
            .map(|(id, node)| {
                index
                    .get(id)
                    .map(|&slot| (slot, node.clone()))
                    .ok_or_else(|| ConfigurationError::UnknownViewNode {
                        view: spec.name.clone(),
                        node: *id,
                    })
            })
            .collect::<SceneResult<Vec<_>>>()?;

        Ok(Self {
            name: spec.name.clone(),
            camera: spec.camera,
            overrides,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    /// `(node slot, override)` pairs in node id order
    pub fn overrides(&self) -> &[(usize, NodeOverride)] {
        &self.overrides
    }
}

/// Buttons of the view menu
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserAction {
    Home,
    List,
    Detail,
    Combined,
    /// Any other view defined by the scene
    Custom(String),
}

impl UserAction {
    pub fn view_name(&self) -> &str {
        match self {
            UserAction::Home => "Home",
            UserAction::List => "List",
            UserAction::Detail => "Detail",
            UserAction::Combined => "Combined",
            UserAction::Custom(name) => name,
        }
    }
}

impl From<&str> for UserAction {
    fn from(name: &str) -> Self {
        match name {
            "Home" => UserAction::Home,
            "List" => UserAction::List,
            "Detail" => UserAction::Detail,
            "Combined" => UserAction::Combined,
            other => UserAction::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.view_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_overrides_to_slots() {
        let index = HashMap::from([(NodeId(7), 0), (NodeId(3), 1)]);
        let spec = ViewSpec::new("List", [1.0, 2.0, 3.0])
            .with_node(3, NodeOverride::at([0.0, 1.0, 0.0]))
            .with_node(7, NodeOverride::default().flag("show_list_plane", true));

        let view = View::resolve(&spec, &index).unwrap();
        assert_eq!(view.name(), "List");
        assert_eq!(view.camera(), [1.0, 2.0, 3.0]);
        let slots: Vec<usize> = view.overrides().iter().map(|(slot, _)| *slot).collect();
        assert_eq!(slots, vec![1, 0]);
    }

    #[test]
    fn unknown_node_in_view_is_rejected() {
        let index = HashMap::from([(NodeId(1), 0)]);
        let spec = ViewSpec::new("Broken", [0.0; 3]).with_node(9, NodeOverride::default());
        assert_eq!(
            View::resolve(&spec, &index).unwrap_err(),
            ConfigurationError::UnknownViewNode {
                view: "Broken".to_string(),
                node: NodeId(9)
            }
        );
    }

    #[test]
    fn actions_map_to_view_names() {
        assert_eq!(UserAction::Combined.view_name(), "Combined");
        assert_eq!(UserAction::from("Detail"), UserAction::Detail);
        assert_eq!(
            UserAction::from("Timeline"),
            UserAction::Custom("Timeline".to_string())
        );
        assert_eq!(UserAction::Custom("Timeline".into()).to_string(), "Timeline");
    }
}
