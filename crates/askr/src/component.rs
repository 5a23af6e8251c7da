//! # Component — The Capability Contract
//!
//! A component is a typed capability attached to a [`Node`]. Nodes store at
//! most one component per concrete type, keyed by [`TypeId`], and hand out
//! shared `Rc<T>` handles to them.
//!
//! ## Ownership
//!
//! The node owns its components strongly (`Rc<dyn Component>` in its map).
//! Each component points back at its node through a weak [`OwnerLink`], so
//! the cycle node → component → node never keeps a subtree alive on its own.
//!
//! ## Interior mutability
//!
//! Components are shared via `Rc`, so every trait method takes `&self` and
//! concrete components keep their mutable state in `Cell`/`RefCell` fields.
//! This crate is single-threaded by design; nothing here is `Send`.
//!
//! [`Node`]: crate::node::Node
//! [`TypeId`]: std::any::TypeId

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::error::SceneError;
use crate::node::Node;

/// The contract every node capability implements.
///
/// The `Any` supertrait is what makes `Node::get_component::<T>()` work:
/// the node upcasts its stored `Rc<dyn Component>` to `Rc<dyn Any>` and
/// downcasts to the concrete type.
pub trait Component: Any {
    /// The weak back-reference to the owning node. Concrete components embed
    /// an [`OwnerLink`] field and return it here; the node fills it in on
    /// attach.
    fn owner_link(&self) -> &OwnerLink;

    /// Stable tag identifying this concrete type in scene documents.
    fn type_name(&self) -> &'static str;

    /// Called right after the component lands on a node.
    fn on_attach(&self) {}

    /// Called right before the component is removed from its node.
    fn on_detach(&self) {}

    /// Per-frame hook, driven by [`Scene::update`](crate::scene::Scene::update).
    fn update(&self, _dt: f32) {}

    /// Produce this component's document payload.
    fn serialize(&self) -> Value;

    /// Restore this component's state from a document payload.
    fn deserialize(&self, data: &Value) -> Result<(), SceneError>;
}

/// Weak handle from a component back to the node that owns it.
///
/// Defaults to unattached; [`node`](OwnerLink::node) returns `None` until
/// the component is added to a node (and again once the node is dropped).
#[derive(Debug, Default)]
pub struct OwnerLink(RefCell<Weak<Node>>);

impl OwnerLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The owning node, if attached and still alive.
    pub fn node(&self) -> Option<Rc<Node>> {
        self.0.borrow().upgrade()
    }

    pub(crate) fn set(&self, owner: Weak<Node>) {
        *self.0.borrow_mut() = owner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Inert {
        owner: OwnerLink,
    }

    impl Component for Inert {
        fn owner_link(&self) -> &OwnerLink {
            &self.owner
        }

        fn type_name(&self) -> &'static str {
            "Inert"
        }

        fn serialize(&self) -> Value {
            json!({})
        }

        fn deserialize(&self, _data: &Value) -> Result<(), SceneError> {
            Ok(())
        }
    }

    #[test]
    fn owner_link_starts_unattached() {
        let c = Inert { owner: OwnerLink::new() };
        assert!(c.owner_link().node().is_none());
    }

    #[test]
    fn default_hooks_are_no_ops() {
        let c = Inert { owner: OwnerLink::new() };
        c.on_attach();
        c.update(0.016);
        c.on_detach();
    }

    #[test]
    fn owner_link_drops_with_the_node() {
        let c = Inert { owner: OwnerLink::new() };
        {
            let node = Node::new("Ephemeral");
            c.owner_link().set(Rc::downgrade(&node));
            assert!(c.owner_link().node().is_some());
        }
        assert!(c.owner_link().node().is_none());
    }
}
