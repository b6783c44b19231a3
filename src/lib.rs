//! graphscene - Animated scene-state engine for view-driven 3D node-and-edge graphs.
//!
//! A scene is a fixed set of nodes and edges plus a table of named views.
//! Selecting a view retargets every node's position and panel flags and the
//! camera; springs and easing then carry the layout there frame by frame.
//! The engine draws nothing itself: each [`Scene::frame`] returns a
//! [`FrameSnapshot`] for an external renderer.
//!
//! ```
//! use graphscene::{Scene, SceneConfig, UserAction};
//!
//! let mut scene = Scene::from_config(&SceneConfig::dashboard()).unwrap();
//! scene.trigger(&UserAction::List).unwrap();
//!
//! let snapshot = scene.frame(1.0 / 60.0);
//! assert_eq!(snapshot.active_view, "List");
//! assert_eq!(snapshot.nodes.len(), 7);
//! ```

pub mod camera;
pub mod config;
pub mod edge;
pub mod error;
pub mod frame;
pub mod math;
pub mod node;
pub mod scene;
pub mod spring;
pub mod view;

pub use camera::CameraFollower;
pub use config::{EdgeSpec, NodeOverride, NodeSpec, SceneConfig, SceneFormat, ViewSpec};
pub use edge::{CurveGeometry, EdgeCurve, EdgeStyle};
pub use error::{ConfigurationError, LoadError, SceneResult};
pub use frame::{
    CameraSnapshot, DanglingReference, EdgeSnapshot, FrameClock, FrameSnapshot, NodeSnapshot,
};
pub use node::{Color, NodeEntity, NodeId, PanelFlags, PanelSpec};
pub use scene::Scene;
pub use spring::{Animatable, Spring, SpringConfig};
pub use view::{UserAction, View};
