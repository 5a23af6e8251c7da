//! # Node — The Tree Vertex
//!
//! A `Node` is a named, activatable vertex in the scene tree with a
//! type-keyed bag of components. Handles are `Rc<Node>` throughout.
//!
//! ## Ownership
//!
//! Strong references point down the tree, weak references point up:
//!
//! ```text
//! parent ──Rc──▶ child           child ──Weak──▶ parent
//! node   ──Rc──▶ component       component ──Weak──▶ node
//! ```
//!
//! Dropping every external handle to a subtree's root therefore frees the
//! whole subtree; nothing below it can keep it alive.
//!
//! ## Interior mutability
//!
//! All mutation goes through `&self` (`Cell` for the `Copy` bits, `RefCell`
//! for the rest), so shared handles can edit the tree freely. Every method
//! drops its borrows before calling out to component hooks or child methods,
//! which keeps recursive edits from panicking mid-walk.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::warn;

use crate::component::Component;
use crate::doc::{ComponentDoc, NodeDoc};
use crate::error::SceneError;
use crate::registry::ComponentRegistry;
use crate::transform::Transform;

/// Fallback name for nodes materialized by the loader before their document
/// name is applied.
const DEFAULT_NAME: &str = "Node";

pub struct Node {
    name: RefCell<String>,
    active: Cell<bool>,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<Rc<Node>>>,
    components: RefCell<HashMap<TypeId, Rc<dyn Component>>>,
    /// Fast path to the transform. The same `Rc` also lives in `components`.
    transform: RefCell<Option<Rc<Transform>>>,
}

impl Node {
    /// Create a detached, active node with a fresh identity [`Transform`].
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        let node = Rc::new(Self {
            name: RefCell::new(name.into()),
            active: Cell::new(true),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            components: RefCell::new(HashMap::new()),
            transform: RefCell::new(None),
        });
        node.add_component(Transform::new());
        node
    }

    // ── Identity and activation ──────────────────────────────────────────

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.borrow_mut() = name.into();
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Set the active flag, pushing the same value to every descendant.
    ///
    /// A no-op when the flag already holds `value`, so descendants are left
    /// untouched in that case. Nodes attached later keep their own flag.
    pub fn set_active(&self, value: bool) {
        if self.active.get() == value {
            return;
        }
        self.active.set(value);
        for child in self.children() {
            child.set_active(value);
        }
    }

    // ── Hierarchy ────────────────────────────────────────────────────────

    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().upgrade()
    }

    /// Snapshot of the current children, in insertion order.
    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Attach this node under `new_parent`, or detach it with `None`.
    ///
    /// When attaching, the node's local transform values are rebased to the
    /// world values it had under its old chain, so the old world values
    /// become its new locals. Passing `None` is plain
    /// [`remove_parent`](Node::remove_parent): the link is cleared and the
    /// locals stay as they are.
    ///
    /// Fails with [`SceneError::CyclicHierarchy`] if `new_parent` is this
    /// node or any of its descendants, leaving the tree untouched.
    pub fn set_parent(self: &Rc<Self>, new_parent: Option<&Rc<Node>>) -> Result<(), SceneError> {
        let Some(new_parent) = new_parent else {
            self.remove_parent();
            return Ok(());
        };

        // Walk up from the candidate; finding ourselves means the candidate
        // sits inside our own subtree (or is us).
        let mut ancestor = Some(new_parent.clone());
        while let Some(current) = ancestor {
            if Rc::ptr_eq(&current, self) {
                return Err(SceneError::CyclicHierarchy);
            }
            ancestor = current.parent();
        }

        // Rebase while the old chain is still wired up, so the snapshot
        // reads the old world values even if the cache is stale.
        if let Some(transform) = self.transform() {
            transform.adopt_world_as_local();
        }

        if let Some(old_parent) = self.parent() {
            old_parent.remove_child(self);
        }
        *self.parent.borrow_mut() = Rc::downgrade(new_parent);
        new_parent.add_child(self);
        Ok(())
    }

    /// Detach from the current parent, if any. Only the links change; the
    /// transform's local values are untouched.
    pub fn remove_parent(&self) {
        if let Some(old_parent) = self.parent() {
            old_parent.remove_child(self);
        }
        *self.parent.borrow_mut() = Weak::new();
    }

    /// Record `child` in this node's child list without touching the
    /// child's parent link. Prefer [`set_parent`](Node::set_parent), which
    /// wires both sides; this is the low-level half.
    ///
    /// Adding a child that is already present (by identity) is a no-op.
    pub fn add_child(&self, child: &Rc<Node>) {
        let present = self
            .children
            .borrow()
            .iter()
            .any(|existing| Rc::ptr_eq(existing, child));
        if !present {
            self.children.borrow_mut().push(child.clone());
        }
    }

    /// Drop `child` from this node's child list, matching by identity. The
    /// child's own parent link is not cleared.
    pub fn remove_child(&self, child: &Node) {
        self.children
            .borrow_mut()
            .retain(|existing| !std::ptr::eq(Rc::as_ptr(existing), child));
    }

    // ── Components ───────────────────────────────────────────────────────

    /// Attach `component`, replacing any prior component of the same type,
    /// and return a shared handle to it. The component's owner link is set
    /// and its `on_attach` hook runs before this returns.
    ///
    /// A replaced prior instance is dropped from the map without a detach
    /// hook; callers that care should remove it explicitly first.
    pub fn add_component<T: Component>(self: &Rc<Self>, component: T) -> Rc<T> {
        let component = Rc::new(component);
        self.attach(TypeId::of::<T>(), component.clone());
        component
    }

    /// Type-erased attach path, shared with the loader.
    pub(crate) fn attach(self: &Rc<Self>, type_id: TypeId, component: Rc<dyn Component>) {
        component.owner_link().set(Rc::downgrade(self));
        self.components.borrow_mut().insert(type_id, component.clone());

        let as_any: Rc<dyn Any> = component.clone();
        if let Ok(transform) = as_any.downcast::<Transform>() {
            *self.transform.borrow_mut() = Some(transform);
        }

        component.on_attach();
    }

    /// Remove the component of type `T`, running its `on_detach` hook
    /// first. Removing an absent type is a no-op.
    pub fn remove_component<T: Component>(&self) {
        let component = self.components.borrow().get(&TypeId::of::<T>()).cloned();
        let Some(component) = component else {
            return;
        };

        component.on_detach();
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            *self.transform.borrow_mut() = None;
        }
        self.components.borrow_mut().remove(&TypeId::of::<T>());
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.components.borrow().contains_key(&TypeId::of::<T>())
    }

    /// Typed lookup. `None` if no component of type `T` is attached.
    pub fn get_component<T: Component>(&self) -> Option<Rc<T>> {
        let component = self.components.borrow().get(&TypeId::of::<T>()).cloned()?;
        let as_any: Rc<dyn Any> = component;
        as_any.downcast::<T>().ok()
    }

    /// The node's transform, via the fast path. `None` only after an
    /// explicit `remove_component::<Transform>()`.
    pub fn transform(&self) -> Option<Rc<Transform>> {
        self.transform.borrow().clone()
    }

    pub fn component_count(&self) -> usize {
        self.components.borrow().len()
    }

    /// Snapshot of every attached component, in unspecified order.
    pub fn components(&self) -> Vec<Rc<dyn Component>> {
        self.components.borrow().values().cloned().collect()
    }

    // ── Document boundary ────────────────────────────────────────────────

    /// Capture this node and its whole subtree as a document fragment.
    pub fn to_doc(&self) -> NodeDoc {
        NodeDoc {
            name: self.name(),
            active: self.active.get(),
            components: self
                .components
                .borrow()
                .values()
                .map(|component| ComponentDoc {
                    ty: component.type_name().to_string(),
                    data: component.serialize(),
                })
                .collect(),
            children: self
                .children
                .borrow()
                .iter()
                .map(|child| child.to_doc())
                .collect(),
        }
    }

    /// Rebuild this node in place from a document fragment.
    ///
    /// Existing components other than the transform are discarded. The
    /// transform instance is kept (or recreated if absent) so its handle
    /// stays valid across a load. Component tags the registry does not know
    /// are logged and skipped rather than failing the load.
    ///
    /// Children are rebuilt from scratch with their parent links wired
    /// directly, so the world-preserving rebase of
    /// [`set_parent`](Node::set_parent) never runs on loaded data.
    pub fn load_doc(
        self: &Rc<Self>,
        doc: &NodeDoc,
        registry: &ComponentRegistry,
    ) -> Result<(), SceneError> {
        *self.name.borrow_mut() = doc.name.clone();
        // Direct write: the loader sets every node's flag from the document,
        // so the cascading setter would only clobber children loaded later.
        self.active.set(doc.active);

        let kept_transform = self.transform();
        self.components.borrow_mut().clear();
        match kept_transform {
            Some(transform) => {
                self.components
                    .borrow_mut()
                    .insert(TypeId::of::<Transform>(), transform);
            }
            None => {
                self.add_component(Transform::new());
            }
        }

        for component_doc in &doc.components {
            let Some(entry) = registry.entry(&component_doc.ty) else {
                warn!(
                    "dropping unknown component type \"{}\" on node \"{}\"",
                    component_doc.ty, doc.name
                );
                continue;
            };

            let existing = self.components.borrow().get(&entry.type_id).cloned();
            match existing {
                Some(component) => component.deserialize(&component_doc.data)?,
                None => {
                    let component = (entry.create)();
                    component.deserialize(&component_doc.data)?;
                    self.attach(entry.type_id, component);
                }
            }
        }

        self.children.borrow_mut().clear();
        for child_doc in &doc.children {
            let child = Node::new(DEFAULT_NAME);
            child.load_doc(child_doc, registry)?;
            *child.parent.borrow_mut() = Rc::downgrade(self);
            self.children.borrow_mut().push(child);
        }
        Ok(())
    }
}
