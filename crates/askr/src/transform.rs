//! # Transform — Hierarchical Spatial State
//!
//! Every node carries exactly one `Transform`. It stores local position,
//! rotation, and scale, plus a cached world-space copy of each guarded by a
//! single dirty flag.
//!
//! ## The dirty-flag protocol
//!
//! - Writing any local value marks this transform dirty and marks each
//!   direct child's transform dirty. One level only: grandchildren are not
//!   touched on write.
//! - Reading any world value recomputes the cache first if the flag is set.
//!   The recompute pulls the parent's world values through the same getters,
//!   so a stale chain cleans itself top-down on demand. That lazy pull is
//!   why invalidating one level is enough.
//!
//! ## Composition rules
//!
//! ```text
//! world_position = parent_world_position + local_position * parent_world_scale
//! world_rotation = parent_world_rotation + local_rotation
//! world_scale    = parent_world_scale    * local_scale        (component-wise)
//! ```
//!
//! Rotation is additive per axis and never rotates the position offset; a
//! child sits at the same world position no matter how its parent is
//! rotated. A node with no parent (or a detached transform) uses its local
//! values as world values directly.

use std::cell::Cell;

use serde_json::{Value, json};

use crate::component::{Component, OwnerLink};
use crate::error::SceneError;
use crate::math::Vec3;

pub struct Transform {
    local_position: Cell<Vec3>,
    local_rotation: Cell<Vec3>,
    local_scale: Cell<Vec3>,

    dirty: Cell<bool>,
    world_position: Cell<Vec3>,
    world_rotation: Cell<Vec3>,
    world_scale: Cell<Vec3>,

    owner: OwnerLink,
}

impl Transform {
    /// Identity transform: zero position and rotation, unit scale. Starts
    /// dirty so the first world read computes the cache.
    pub fn new() -> Self {
        Self {
            local_position: Cell::new(Vec3::ZERO),
            local_rotation: Cell::new(Vec3::ZERO),
            local_scale: Cell::new(Vec3::ONE),
            dirty: Cell::new(true),
            world_position: Cell::new(Vec3::ZERO),
            world_rotation: Cell::new(Vec3::ZERO),
            world_scale: Cell::new(Vec3::ONE),
            owner: OwnerLink::new(),
        }
    }

    // ── Local state ──────────────────────────────────────────────────────

    pub fn local_position(&self) -> Vec3 {
        self.local_position.get()
    }

    pub fn local_rotation(&self) -> Vec3 {
        self.local_rotation.get()
    }

    pub fn local_scale(&self) -> Vec3 {
        self.local_scale.get()
    }

    pub fn set_local_position(&self, position: Vec3) {
        self.local_position.set(position);
        self.invalidate();
    }

    pub fn set_local_rotation(&self, rotation: Vec3) {
        self.local_rotation.set(rotation);
        self.invalidate();
    }

    pub fn set_local_scale(&self, scale: Vec3) {
        self.local_scale.set(scale);
        self.invalidate();
    }

    /// Add `delta` to the local position.
    pub fn translate_local(&self, delta: Vec3) {
        self.set_local_position(self.local_position.get() + delta);
    }

    /// Add `delta` to the local rotation.
    pub fn rotate_local(&self, delta: Vec3) {
        self.set_local_rotation(self.local_rotation.get() + delta);
    }

    // ── World state ──────────────────────────────────────────────────────

    pub fn world_position(&self) -> Vec3 {
        if self.dirty.get() {
            self.refresh_world();
        }
        self.world_position.get()
    }

    pub fn world_rotation(&self) -> Vec3 {
        if self.dirty.get() {
            self.refresh_world();
        }
        self.world_rotation.get()
    }

    pub fn world_scale(&self) -> Vec3 {
        if self.dirty.get() {
            self.refresh_world();
        }
        self.world_scale.get()
    }

    /// Whether the world cache is stale. World getters clear this.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Mark this transform and every direct child's transform stale.
    fn invalidate(&self) {
        self.dirty.set(true);
        if let Some(node) = self.owner.node() {
            for child in node.children() {
                if let Some(child_transform) = child.transform() {
                    child_transform.dirty.set(true);
                }
            }
        }
    }

    /// Recompute the world cache from the parent chain, then clear the flag.
    fn refresh_world(&self) {
        let parent_transform = self
            .owner
            .node()
            .and_then(|node| node.parent())
            .and_then(|parent| parent.transform());

        match parent_transform {
            Some(parent) => {
                // These getters clean the parent first if it is stale too.
                let parent_position = parent.world_position();
                let parent_rotation = parent.world_rotation();
                let parent_scale = parent.world_scale();

                self.world_position
                    .set(parent_position + self.local_position.get() * parent_scale);
                self.world_rotation
                    .set(parent_rotation + self.local_rotation.get());
                self.world_scale.set(parent_scale * self.local_scale.get());
            }
            None => {
                self.world_position.set(self.local_position.get());
                self.world_rotation.set(self.local_rotation.get());
                self.world_scale.set(self.local_scale.get());
            }
        }

        self.dirty.set(false);
    }

    /// Rebase the local values onto the current world values.
    ///
    /// Used when a node changes parent. All three world values are
    /// snapshotted up front, then written back as locals; interleaving the
    /// reads with the writes would let the first write dirty the cache and
    /// corrupt the later reads.
    pub(crate) fn adopt_world_as_local(&self) {
        let position = self.world_position();
        let rotation = self.world_rotation();
        let scale = self.world_scale();
        self.set_local_position(position);
        self.set_local_rotation(rotation);
        self.set_local_scale(scale);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Transform {
    fn owner_link(&self) -> &OwnerLink {
        &self.owner
    }

    fn type_name(&self) -> &'static str {
        "Transform"
    }

    fn on_attach(&self) {
        self.dirty.set(true);
        self.refresh_world();
    }

    fn on_detach(&self) {
        // Freeze world at local so the values stay meaningful without a
        // tree behind them. The dirty flag is left as-is.
        self.world_position.set(self.local_position.get());
        self.world_rotation.set(self.local_rotation.get());
        self.world_scale.set(self.local_scale.get());
    }

    fn serialize(&self) -> Value {
        json!({
            "position": self.local_position.get(),
            "rotation": self.local_rotation.get(),
            "scale": self.local_scale.get(),
        })
    }

    fn deserialize(&self, data: &Value) -> Result<(), SceneError> {
        let position = data
            .get("position")
            .ok_or(SceneError::MissingField("position"))?;
        let rotation = data
            .get("rotation")
            .ok_or(SceneError::MissingField("rotation"))?;
        let scale = data.get("scale").ok_or(SceneError::MissingField("scale"))?;

        self.local_position.set(Vec3::from_value(position)?);
        self.local_rotation.set(Vec3::from_value(rotation)?);
        self.local_scale.set(Vec3::from_value(scale)?);
        self.dirty.set(true);
        Ok(())
    }
}
