//! # Scene — Root Container and Update Driver
//!
//! A `Scene` owns a list of root nodes, drives the per-frame update sweep,
//! and carries the [`ComponentRegistry`] used when loading documents.
//!
//! ## Traversal
//!
//! Every walk ([`for_each_node`](Scene::for_each_node), update, search)
//! runs over a pre-order snapshot of strong handles taken before the first
//! callback. Callbacks may therefore reparent, deactivate, or remove nodes
//! without invalidating the walk; nodes added during a walk are picked up
//! on the next one.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use serde_json::Value;

use crate::doc::SceneDoc;
use crate::error::SceneError;
use crate::node::Node;
use crate::registry::ComponentRegistry;

pub struct Scene {
    root_nodes: RefCell<Vec<Rc<Node>>>,
    registry: ComponentRegistry,
}

impl Scene {
    /// An empty scene whose registry already knows the built-in
    /// [`Transform`](crate::transform::Transform).
    pub fn new() -> Self {
        Self {
            root_nodes: RefCell::new(Vec::new()),
            registry: ComponentRegistry::new(),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Mutable registry access, for registering application components
    /// before loading documents that mention them.
    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    /// Snapshot of the current roots, in insertion order.
    pub fn root_nodes(&self) -> Vec<Rc<Node>> {
        self.root_nodes.borrow().clone()
    }

    // ── Node management ──────────────────────────────────────────────────

    /// Create a node and track it as a root.
    pub fn create_node(&mut self, name: impl Into<String>) -> Rc<Node> {
        let node = Node::new(name);
        debug!("created root node \"{}\"", node.name());
        self.root_nodes.borrow_mut().push(node.clone());
        node
    }

    /// Create a node already attached under `parent`. The child is not a
    /// root; it is reachable through its parent.
    pub fn create_child_node(&mut self, parent: &Rc<Node>, name: impl Into<String>) -> Rc<Node> {
        let node = Node::new(name);
        node.set_parent(Some(parent))
            .expect("a fresh node cannot form a cycle");
        node
    }

    /// Remove `node` and its whole subtree from the scene's reachable set.
    ///
    /// The node is dropped from the root list and detached from its parent.
    /// Children are removed recursively; their parent back-links are left
    /// pointing at nodes the scene no longer reaches, which outside handles
    /// can still observe until the subtree is dropped.
    ///
    /// Safe to call from inside a [`for_each_node`](Scene::for_each_node)
    /// callback, including on the node currently being visited; the walk
    /// finishes over its snapshot.
    pub fn remove_node(&self, node: &Rc<Node>) {
        self.root_nodes.borrow_mut().retain(|root| !Rc::ptr_eq(root, node));
        if let Some(parent) = node.parent() {
            parent.remove_child(node);
        }
        for child in node.children() {
            self.remove_node(&child);
        }
    }

    /// Visit every reachable node in pre-order, over a snapshot.
    pub fn for_each_node(&self, mut visit: impl FnMut(&Rc<Node>)) {
        for node in self.collect_nodes() {
            visit(&node);
        }
    }

    /// Number of nodes currently reachable from the roots.
    pub fn node_count(&self) -> usize {
        self.collect_nodes().len()
    }

    /// First node (in pre-order) whose name matches exactly.
    pub fn find_node_by_name(&self, name: &str) -> Option<Rc<Node>> {
        self.collect_nodes()
            .into_iter()
            .find(|node| node.name() == name)
    }

    fn collect_nodes(&self) -> Vec<Rc<Node>> {
        fn collect(node: &Rc<Node>, out: &mut Vec<Rc<Node>>) {
            out.push(node.clone());
            for child in node.children() {
                collect(&child, out);
            }
        }

        let mut out = Vec::new();
        for root in self.root_nodes.borrow().iter() {
            collect(root, &mut out);
        }
        out
    }

    // ── Update ───────────────────────────────────────────────────────────

    /// Run the `update` hook of every component on every active node.
    ///
    /// Inactive nodes are skipped entirely; their subtrees are still
    /// walked, so a descendant reactivated independently keeps updating.
    pub fn update(&self, dt: f32) {
        self.for_each_node(|node| {
            if !node.is_active() {
                return;
            }
            for component in node.components() {
                component.update(dt);
            }
        });
    }

    // ── Document boundary ────────────────────────────────────────────────

    /// Capture the whole scene as a document.
    pub fn to_doc(&self) -> SceneDoc {
        SceneDoc {
            root_nodes: self
                .root_nodes
                .borrow()
                .iter()
                .map(|root| root.to_doc())
                .collect(),
        }
    }

    /// Replace the scene contents with the document's.
    ///
    /// The new root set is built completely before it replaces the old one,
    /// so a failing load leaves the scene exactly as it was.
    pub fn load_doc(&mut self, doc: &SceneDoc) -> Result<(), SceneError> {
        let mut roots = Vec::with_capacity(doc.root_nodes.len());
        for node_doc in &doc.root_nodes {
            let node = Node::new("Node");
            node.load_doc(node_doc, &self.registry)?;
            roots.push(node);
        }
        info!("loaded scene with {} root node(s)", roots.len());
        *self.root_nodes.borrow_mut() = roots;
        Ok(())
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> Result<Value, SceneError> {
        Ok(serde_json::to_value(self.to_doc())?)
    }

    /// Load from a JSON value produced by [`to_value`](Scene::to_value) or
    /// read from disk.
    pub fn load_value(&mut self, value: &Value) -> Result<(), SceneError> {
        let doc: SceneDoc = serde_json::from_value(value.clone())?;
        self.load_doc(&doc)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self.to_doc())?)
    }

    /// Load from a JSON string.
    pub fn load_json(&mut self, json: &str) -> Result<(), SceneError> {
        let doc: SceneDoc = serde_json::from_str(json)?;
        self.load_doc(&doc)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, OwnerLink};
    use crate::math::Vec3;
    use crate::transform::Transform;
    use serde_json::json;
    use std::cell::Cell;

    #[derive(Default)]
    struct Ticker {
        owner: OwnerLink,
        ticks: Cell<u32>,
        last_dt: Cell<f32>,
    }

    impl Component for Ticker {
        fn owner_link(&self) -> &OwnerLink {
            &self.owner
        }

        fn type_name(&self) -> &'static str {
            "Ticker"
        }

        fn update(&self, dt: f32) {
            self.ticks.set(self.ticks.get() + 1);
            self.last_dt.set(dt);
        }

        fn serialize(&self) -> Value {
            json!({"ticks": self.ticks.get()})
        }

        fn deserialize(&self, data: &Value) -> Result<(), SceneError> {
            let ticks = data
                .get("ticks")
                .and_then(Value::as_u64)
                .ok_or(SceneError::MissingField("ticks"))?;
            self.ticks.set(ticks as u32);
            Ok(())
        }
    }

    #[test]
    fn create_node_tracks_a_root() {
        let mut scene = Scene::new();
        let node = scene.create_node("Root");
        assert_eq!(scene.root_nodes().len(), 1);
        assert!(Rc::ptr_eq(&scene.root_nodes()[0], &node));
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn create_child_node_is_not_a_root() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root");
        let child = scene.create_child_node(&root, "Child");

        assert_eq!(scene.root_nodes().len(), 1);
        assert!(Rc::ptr_eq(&child.parent().unwrap(), &root));
        assert_eq!(scene.node_count(), 2);
    }

    #[test]
    fn for_each_node_walks_pre_order() {
        let mut scene = Scene::new();
        let a = scene.create_node("A");
        let b = scene.create_child_node(&a, "B");
        scene.create_child_node(&b, "C");
        scene.create_node("D");

        let mut names = Vec::new();
        scene.for_each_node(|node| names.push(node.name()));
        assert_eq!(names, ["A", "B", "C", "D"]);
    }

    #[test]
    fn traversal_snapshot_survives_removal_mid_walk() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root");
        scene.create_child_node(&root, "First");
        scene.create_child_node(&root, "Second");

        let mut visited = Vec::new();
        scene.for_each_node(|node| {
            visited.push(node.name());
            if node.name() == "Root" {
                // chop the children out from under the walk
                for child in node.children() {
                    node.remove_child(&child);
                }
            }
        });

        // the snapshot still reaches both children
        assert_eq!(visited, ["Root", "First", "Second"]);
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn removing_the_visited_node_mid_walk_completes_the_snapshot() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root");
        scene.create_child_node(&root, "First");
        scene.create_child_node(&root, "Second");

        let mut visited = Vec::new();
        scene.for_each_node(|node| {
            visited.push(node.name());
            scene.remove_node(node);
        });

        // every node from the original snapshot is still visited
        assert_eq!(visited, ["Root", "First", "Second"]);
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn remove_node_takes_the_whole_subtree() {
        let mut scene = Scene::new();
        let keeper = scene.create_node("Keeper");
        let root = scene.create_node("Doomed");
        let left = scene.create_child_node(&root, "Left");
        let right = scene.create_child_node(&root, "Right");
        scene.create_child_node(&left, "LeftLeaf");
        scene.create_child_node(&right, "RightLeaf");

        assert_eq!(scene.node_count(), 6);
        scene.remove_node(&root);
        assert_eq!(scene.node_count(), 1);
        assert!(Rc::ptr_eq(&scene.root_nodes()[0], &keeper));
    }

    #[test]
    fn remove_node_detaches_a_mid_tree_node() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root");
        let mid = scene.create_child_node(&root, "Mid");
        scene.create_child_node(&mid, "Leaf");

        scene.remove_node(&mid);
        assert_eq!(scene.node_count(), 1);
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn find_node_by_name_returns_the_first_match() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root");
        let first = scene.create_child_node(&root, "Twin");
        scene.create_node("Twin");

        let found = scene.find_node_by_name("Twin").unwrap();
        assert!(Rc::ptr_eq(&found, &first));
        assert!(scene.find_node_by_name("Missing").is_none());
    }

    #[test]
    fn update_reaches_components_on_active_nodes() {
        let mut scene = Scene::new();
        let node = scene.create_node("Host");
        let ticker = node.add_component(Ticker::default());

        scene.update(0.25);
        scene.update(0.5);
        assert_eq!(ticker.ticks.get(), 2);
        assert_eq!(ticker.last_dt.get(), 0.5);
    }

    #[test]
    fn update_skips_inactive_nodes() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root");
        let child = scene.create_child_node(&root, "Child");
        let root_ticker = root.add_component(Ticker::default());
        let child_ticker = child.add_component(Ticker::default());

        root.set_active(false);
        scene.update(0.1);
        assert_eq!(root_ticker.ticks.get(), 0);
        assert_eq!(child_ticker.ticks.get(), 0);

        // a descendant reactivated on its own still updates
        child.set_active(true);
        scene.update(0.1);
        assert_eq!(root_ticker.ticks.get(), 0);
        assert_eq!(child_ticker.ticks.get(), 1);
    }

    #[test]
    fn round_trip_preserves_structure_and_state() {
        let mut scene = Scene::new();
        scene.registry_mut().register::<Ticker>();

        let sun = scene.create_node("Sun");
        sun.transform()
            .unwrap()
            .set_local_position(Vec3::new(0.0, 0.0, 0.0));
        let earth = scene.create_child_node(&sun, "Earth");
        earth
            .transform()
            .unwrap()
            .set_local_position(Vec3::new(10.0, 0.0, 0.0));
        let moon = scene.create_child_node(&earth, "Moon");
        moon.transform()
            .unwrap()
            .set_local_position(Vec3::new(2.0, 0.0, 0.0));
        let ticker = earth.add_component(Ticker::default());
        ticker.ticks.set(99);
        earth.set_active(false);

        let value = scene.to_value().unwrap();

        let mut restored = Scene::new();
        restored.registry_mut().register::<Ticker>();
        restored.load_value(&value).unwrap();

        assert_eq!(restored.node_count(), 3);
        let earth2 = restored.find_node_by_name("Earth").unwrap();
        assert!(!earth2.is_active());
        assert_eq!(earth2.get_component::<Ticker>().unwrap().ticks.get(), 99);

        let moon2 = restored.find_node_by_name("Moon").unwrap();
        assert_eq!(
            moon2.transform().unwrap().world_position(),
            Vec3::new(12.0, 0.0, 0.0)
        );
    }

    #[test]
    fn load_replaces_previous_contents() {
        let mut scene = Scene::new();
        scene.create_node("Old");
        let doc = {
            let mut other = Scene::new();
            other.create_node("New");
            other.to_doc()
        };

        scene.load_doc(&doc).unwrap();
        assert_eq!(scene.node_count(), 1);
        assert!(scene.find_node_by_name("Old").is_none());
        assert!(scene.find_node_by_name("New").is_some());
    }

    #[test]
    fn failed_load_leaves_the_scene_untouched() {
        let mut scene = Scene::new();
        scene.create_node("Survivor");

        // Transform payload with a missing key makes the load fail.
        let bad = json!({
            "rootNodes": [{
                "name": "Broken",
                "active": true,
                "components": [{"type": "Transform", "data": {"position": {"x": 0.0, "y": 0.0, "z": 0.0}}}],
                "children": [],
            }]
        });
        let err = scene.load_value(&bad).unwrap_err();
        assert!(matches!(err, SceneError::MissingField(_)));

        assert_eq!(scene.node_count(), 1);
        assert!(scene.find_node_by_name("Survivor").is_some());
    }

    #[test]
    fn malformed_document_is_a_document_error() {
        let mut scene = Scene::new();
        let err = scene.load_json("{\"rootNodes\": [{}]}").unwrap_err();
        assert!(matches!(err, SceneError::Document(_)));
    }

    #[test]
    fn unknown_component_types_survive_as_a_dropped_tag() {
        let mut scene = Scene::new();
        let value = json!({
            "rootNodes": [{
                "name": "Host",
                "active": true,
                "components": [{"type": "Jetpack", "data": {"fuel": 10}}],
                "children": [],
            }]
        });
        scene.load_value(&value).unwrap();

        let host = scene.find_node_by_name("Host").unwrap();
        assert_eq!(host.component_count(), 1);
        assert!(host.has_component::<Transform>());
    }

    #[test]
    fn json_string_round_trip() {
        let mut scene = Scene::new();
        scene.create_node("Solo");
        let text = scene.to_json().unwrap();

        let mut restored = Scene::new();
        restored.load_json(&text).unwrap();
        assert!(restored.find_node_by_name("Solo").is_some());
    }
}
