//! Scene state machine and per-frame update loop
//!
//! A [`Scene`] owns the node table, the edge table, the resolved views and
//! the camera. Each call to [`Scene::frame`] runs the update in a fixed order:
//!
//! 1. apply a pending view change, if one was requested
//! 2. sample every node spring
//! 3. rebuild every edge from the freshly sampled node positions
//! 4. tick the camera
//!
//! and returns a [`FrameSnapshot`] for the renderer.

use std::collections::{HashMap, HashSet};

use crate::camera::CameraFollower;
use crate::config::SceneConfig;
use crate::edge::EdgeCurve;
use crate::error::{ConfigurationError, SceneResult};
use crate::frame::{DanglingReference, FrameClock, FrameSnapshot};
use crate::node::{NodeEntity, NodeId};
use crate::view::{UserAction, View};

pub struct Scene {
    name: String,
    nodes: Vec<NodeEntity>,
    /// Node id to position in `nodes`
    index: HashMap<NodeId, usize>,
    edges: Vec<EdgeCurve>,
    views: Vec<View>,
    active_view: usize,
    pending_view: Option<usize>,
    camera: CameraFollower,
    clock: FrameClock,
}

impl Scene {
    /// Validate `config` and build a scene resting in its initial view
    pub fn from_config(config: &SceneConfig) -> SceneResult<Self> {
        let animation = &config.animation;
        animation.spring.validate()?;
        let clock = FrameClock::new(animation.max_frame_dt)?;

        let mut nodes = Vec::with_capacity(config.nodes.len());
        let mut index = HashMap::with_capacity(config.nodes.len());
        for spec in &config.nodes {
            if index.insert(spec.id, nodes.len()).is_some() {
                return Err(ConfigurationError::DuplicateNode(spec.id));
            }
            nodes.push(NodeEntity::new(spec, animation.spring)?);
        }

        let edges = config
            .edges
            .iter()
            .map(|spec| EdgeCurve::new(spec, config.edge_style))
            .collect::<SceneResult<Vec<_>>>()?;

        let mut names = HashSet::new();
        let mut views = Vec::with_capacity(config.views.len());
        for spec in &config.views {
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigurationError::DuplicateView(spec.name.clone()));
            }
            views.push(View::resolve(spec, &index)?);
        }

        let initial = views
            .iter()
            .position(|view| view.name() == config.initial_view)
            .ok_or_else(|| ConfigurationError::UnknownView(config.initial_view.clone()))?;

        let camera = CameraFollower::new(views[initial].camera(), animation.camera_follow_rate)?
            .with_look_at(animation.look_at);

        let mut scene = Self {
            name: config.name.clone(),
            nodes,
            index,
            edges,
            views,
            active_view: initial,
            pending_view: None,
            camera,
            clock,
        };

        // The initial layout is placed, not animated
        scene.apply_slot(initial);
        for node in &mut scene.nodes {
            node.jump_to_target();
        }

        tracing::debug!(
            scene = %scene.name,
            nodes = scene.nodes.len(),
            edges = scene.edges.len(),
            views = scene.views.len(),
            initial = %config.initial_view,
            "scene built"
        );
        Ok(scene)
    }

    /// Switch to the named view now, dropping any queued request.
    ///
    /// An unknown name returns [`ConfigurationError::UnknownView`] and changes nothing.
    pub fn apply_view(&mut self, name: &str) -> SceneResult<()> {
        let slot = self.view_slot(name)?;
        self.pending_view = None;
        self.apply_slot(slot);
        Ok(())
    }

    /// Queue a view switch for the start of the next frame.
    ///
    /// The name is checked immediately. A later request replaces an earlier one.
    pub fn request_view(&mut self, name: &str) -> SceneResult<()> {
        let slot = self.view_slot(name)?;
        tracing::debug!(view = name, "view change requested");
        self.pending_view = Some(slot);
        Ok(())
    }

    /// Apply the view behind a menu action
    pub fn trigger(&mut self, action: &UserAction) -> SceneResult<()> {
        self.apply_view(action.view_name())
    }

    fn view_slot(&self, name: &str) -> SceneResult<usize> {
        self.views
            .iter()
            .position(|view| view.name() == name)
            .ok_or_else(|| {
                tracing::warn!(view = name, "unknown view requested");
                ConfigurationError::UnknownView(name.to_string())
            })
    }

    fn apply_slot(&mut self, slot: usize) {
        let view = &self.views[slot];
        for (node_slot, fields) in view.overrides() {
            let node = &mut self.nodes[*node_slot];
            if let Some(position) = fields.position {
                node.set_target_position(position);
            }
            node.set_flags(&fields.flags);
        }
        self.camera.set_target(view.camera());
        self.active_view = slot;
        tracing::info!(view = view.name(), "applied view");
    }

    /// Advance the scene by `raw_dt` seconds and return what to draw
    pub fn frame(&mut self, raw_dt: f32) -> FrameSnapshot {
        let dt = self.clock.advance(raw_dt);

        if let Some(slot) = self.pending_view.take() {
            self.apply_slot(slot);
        }

        for node in &mut self.nodes {
            node.sample(dt);
        }

        let mut edges = Vec::with_capacity(self.edges.len());
        let mut dangling = Vec::new();
        for (edge_index, edge) in self.edges.iter_mut().enumerate() {
            let start = self.index.get(&edge.start_id()).map(|&slot| &self.nodes[slot]);
            let end = self.index.get(&edge.end_id()).map(|&slot| &self.nodes[slot]);

            if let (Some(start), Some(end)) = (start, end) {
                edges.push(edge.update(start, end, dt));
                continue;
            }

            edge.advance_dash(dt);
            let missing: Vec<NodeId> = [(edge.start_id(), start), (edge.end_id(), end)]
                .into_iter()
                .filter(|(_, node)| node.is_none())
                .map(|(id, _)| id)
                .collect();
            if edge.mark_dangling() {
                tracing::warn!(
                    edge_index,
                    ?missing,
                    start = %edge.start_id(),
                    end = %edge.end_id(),
                    "edge references a node that does not exist; skipping"
                );
            } else {
                tracing::trace!(edge_index, ?missing, "skipping dangling edge");
            }
            dangling.extend(missing.into_iter().map(|missing| DanglingReference {
                edge_index,
                missing,
            }));
        }

        self.camera.tick(dt);

        FrameSnapshot {
            frame: self.clock.frame(),
            dt,
            active_view: self.active_view().to_string(),
            nodes: self.nodes.iter().map(NodeEntity::snapshot).collect(),
            edges,
            camera: self.camera.snapshot(),
            dangling,
        }
    }

    /// Run frames of `dt` until everything has settled or `max_frames` have run.
    ///
    /// Always runs at least one frame and returns the last snapshot.
    pub fn run_to_convergence(&mut self, dt: f32, max_frames: usize) -> FrameSnapshot {
        let mut last = self.frame(dt);
        for _ in 1..max_frames {
            if self.is_settled() {
                break;
            }
            last = self.frame(dt);
        }
        last
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the most recently applied view
    pub fn active_view(&self) -> &str {
        self.views[self.active_view].name()
    }

    /// View queued by [`Scene::request_view`], if any
    pub fn pending_view(&self) -> Option<&str> {
        self.pending_view.map(|slot| self.views[slot].name())
    }

    pub fn view_names(&self) -> impl Iterator<Item = &str> {
        self.views.iter().map(View::name)
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeEntity> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn nodes(&self) -> &[NodeEntity] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeCurve] {
        &self.edges
    }

    pub fn camera(&self) -> &CameraFollower {
        &self.camera
    }

    /// Frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.clock.frame()
    }

    /// True when no view change is pending, every node rests on its target
    /// and the camera has arrived
    pub fn is_settled(&self) -> bool {
        self.pending_view.is_none()
            && !self.camera.is_animating()
            && self.nodes.iter().all(NodeEntity::is_settled)
    }
}
