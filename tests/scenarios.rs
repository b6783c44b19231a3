//! View-switching scenarios driven through the public API.

use std::path::Path;

use graphscene::node::flags;
use graphscene::{
    ConfigurationError, DanglingReference, EdgeSpec, NodeId, Scene, SceneConfig, UserAction,
};

const FRAME: f32 = 1.0 / 60.0;

fn dashboard() -> Scene {
    Scene::from_config(&SceneConfig::dashboard()).expect("built-in dashboard is valid")
}

fn close(a: [f32; 3], b: [f32; 3], tolerance: f32) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}

#[test]
fn home_to_list_converges_on_list_layout() {
    let mut scene = dashboard();
    scene.trigger(&UserAction::List).unwrap();

    let snapshot = scene.run_to_convergence(FRAME, 5000);
    assert!(scene.is_settled());

    let node = snapshot.node(NodeId(1)).unwrap();
    assert_eq!(node.position, [3.0, 4.0, -4.0]);
    assert!(node.flags.get(flags::SHOW_LIST_PLANE));
    assert!(!node.flags.get(flags::SHOW_DETAIL_PLANE));

    assert!(close(snapshot.camera.position, [3.0, 2.5, -12.0], 1e-3));
    assert_eq!(snapshot.active_view, "List");
}

#[test]
fn list_panels_become_visible() {
    let mut scene = dashboard();
    let home = scene.frame(FRAME);
    assert!(home.node(NodeId(1)).unwrap().panels.is_empty());

    scene.trigger(&UserAction::List).unwrap();
    let list = scene.frame(FRAME);
    let panels = &list.node(NodeId(1)).unwrap().panels;
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].flag, flags::SHOW_LIST_PLANE);
}

#[test]
fn nodes_move_toward_target_during_transition() {
    let mut scene = dashboard();
    scene.trigger(&UserAction::Detail).unwrap();

    let target = scene.node(NodeId(1)).unwrap().target_position();
    let start = scene.node(NodeId(1)).unwrap().current_position();
    let initial_gap = graphscene::math::distance(start, target);

    for _ in 0..30 {
        scene.frame(FRAME);
    }
    let midway = scene.node(NodeId(1)).unwrap().current_position();
    assert!(graphscene::math::distance(midway, target) < initial_gap);
    assert!(!scene.is_settled());
}

#[test]
fn unknown_view_leaves_scene_untouched() {
    let mut scene = dashboard();
    scene.trigger(&UserAction::Combined).unwrap();
    scene.run_to_convergence(FRAME, 5000);
    let before = scene.frame(FRAME);

    let err = scene.apply_view("Timeline").unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownView("Timeline".to_string()));

    let after = scene.frame(FRAME);
    assert_eq!(after.active_view, "Combined");
    assert_eq!(after.nodes, before.nodes);
    assert_eq!(after.camera.target, before.camera.target);
}

#[test]
fn reapplying_active_view_does_not_restart_motion() {
    let mut scene = dashboard();
    scene.trigger(&UserAction::List).unwrap();
    for _ in 0..20 {
        scene.frame(FRAME);
    }
    let mid = scene.node(NodeId(1)).unwrap().current_position();

    scene.trigger(&UserAction::List).unwrap();
    assert_eq!(scene.node(NodeId(1)).unwrap().current_position(), mid);
    assert_eq!(
        scene.node(NodeId(1)).unwrap().target_position(),
        [3.0, 4.0, -4.0]
    );
}

#[test]
fn switching_mid_transition_redirects_smoothly() {
    let mut scene = dashboard();
    scene.trigger(&UserAction::List).unwrap();
    for _ in 0..14 {
        scene.frame(FRAME);
    }
    let last = scene.frame(FRAME).node(NodeId(1)).unwrap().position;

    scene.trigger(&UserAction::Home).unwrap();
    let next = scene.frame(FRAME).node(NodeId(1)).unwrap().position;
    // One frame of motion, no jump back to the old layout
    assert!(graphscene::math::distance(last, next) < 1.5);

    let settled = scene.run_to_convergence(FRAME, 5000);
    assert_eq!(settled.node(NodeId(1)).unwrap().position, [-2.0, 1.0, 3.0]);
}

#[test]
fn edges_follow_nodes_every_frame() {
    let mut scene = dashboard();
    scene.trigger(&UserAction::Detail).unwrap();

    let mut phase = None;
    for _ in 0..60 {
        let snapshot = scene.frame(FRAME);
        assert_eq!(snapshot.edges.len(), 7);
        assert!(snapshot.dangling.is_empty());
        for edge in &snapshot.edges {
            let start = snapshot.node(edge.start_id).unwrap();
            let end = snapshot.node(edge.end_id).unwrap();
            assert_eq!(edge.geometry.start, start.position);
            assert_eq!(edge.geometry.end, end.position);
        }
        let first = snapshot.edges[0].dash_phase;
        if let Some(previous) = phase {
            assert_ne!(first, previous);
        }
        phase = Some(first);
    }
}

#[test]
fn dangling_edge_does_not_stop_the_scene() {
    let mut config = SceneConfig::dashboard();
    config.edges.insert(0, EdgeSpec::new(99, 1));
    let mut scene = Scene::from_config(&config).unwrap();

    scene.trigger(&UserAction::List).unwrap();
    let snapshot = scene.run_to_convergence(FRAME, 5000);

    assert_eq!(snapshot.edges.len(), 7);
    assert_eq!(
        snapshot.dangling,
        vec![DanglingReference {
            edge_index: 0,
            missing: NodeId(99)
        }]
    );
    assert_eq!(
        snapshot.node(NodeId(1)).unwrap().position,
        [3.0, 4.0, -4.0]
    );
}

#[test]
fn scene_loads_from_yaml_document() {
    let config = SceneConfig::from_path(Path::new("scenes/dashboard.yaml")).unwrap();
    let scene = Scene::from_config(&config).unwrap();
    assert_eq!(scene.name(), "dashboard");
    assert_eq!(scene.nodes().len(), 7);
    assert_eq!(scene.edges().len(), 7);
}

#[test]
fn camel_case_flags_in_documents_are_accepted() {
    let config = SceneConfig::from_path(Path::new("tests/fixtures/pair.yaml")).unwrap();
    let mut scene = Scene::from_config(&config).unwrap();
    assert_eq!(scene.active_view(), "Apart");

    scene.apply_view("Together").unwrap();
    let node = scene.node(NodeId(1)).unwrap();
    assert!(node.current_flags().get(flags::SHOW_DETAIL_PLANE));
    assert_eq!(node.target_position(), [1.0, 1.0, 0.0]);
}

#[test]
fn view_with_unknown_node_is_rejected_at_build() {
    let config =
        SceneConfig::from_path(Path::new("tests/fixtures/unknown_view_node.yaml")).unwrap();
    assert_eq!(
        Scene::from_config(&config).err(),
        Some(ConfigurationError::UnknownViewNode {
            view: "Home".to_string(),
            node: NodeId(4)
        })
    );
}
