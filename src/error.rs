//! Error taxonomy for scene construction, view switching and document loading
//!
//! Configuration errors are raised by the call that introduced them, before
//! any state is mutated. Dangling edge references are not errors: they are
//! reported per frame as [`DanglingReference`](crate::frame::DanglingReference).

use thiserror::Error;

use crate::node::NodeId;

/// Invalid parameters or an unknown name supplied to the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A spring parameter was zero, negative or not finite
    #[error("invalid spring {parameter}: {value} (must be positive and finite)")]
    InvalidSpring {
        parameter: &'static str,
        value: f32,
    },

    /// Camera follow rate outside the open interval (0, 1)
    #[error("invalid camera follow rate: {0} (must be in (0, 1))")]
    InvalidFollowRate(f32),

    /// Edge line width was zero, negative or not finite
    #[error("invalid line width {value} on edge {start} -> {end}")]
    InvalidLineWidth {
        start: NodeId,
        end: NodeId,
        value: f32,
    },

    /// Node size was zero, negative or not finite
    #[error("invalid size {value} on node {id}")]
    InvalidNodeSize { id: NodeId, value: f32 },

    /// A color string could not be parsed as `#RRGGBB` or `#RRGGBBAA`
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Maximum frame delta was zero, negative or not finite
    #[error("invalid maximum frame delta: {0}")]
    InvalidFrameDt(f32),

    /// Two nodes share the same id
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// Two views share the same name
    #[error("duplicate view name: {0}")]
    DuplicateView(String),

    /// A view overrides a node that is not in the node table
    #[error("view {view:?} references unknown node {node}")]
    UnknownViewNode { view: String, node: NodeId },

    /// No view with this name exists
    #[error("unknown view: {0:?}")]
    UnknownView(String),
}

/// Errors that can occur while loading a scene document
#[derive(Error, Debug)]
pub enum LoadError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML document could not be parsed
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document could not be parsed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension could not be mapped to a document format
    #[error("could not determine scene format from path: {0}")]
    UnknownExtension(String),

    /// The document parsed but describes an invalid scene
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Result type for engine operations
pub type SceneResult<T> = Result<T, ConfigurationError>;
