//! # askr — A Retained Scene Graph with Typed Components
//!
//! A small, single-threaded scene-graph library: named [`Node`]s form a
//! tree, each node carries a type-keyed bag of [`Component`]s, and a
//! [`Scene`] owns the roots, drives updates, and round-trips the whole
//! structure through JSON documents.
//!
//! ## Module Overview
//!
//! - [`math`] — [`Vec3`] and its composition rules
//! - [`error`] — [`SceneError`]
//! - [`doc`] — wire-format structs for scene documents
//! - [`component`] — the [`Component`] trait and [`OwnerLink`]
//! - [`transform`] — hierarchical spatial state with a dirty-flag cache
//! - [`node`] — the tree vertex
//! - [`registry`] — tag → factory dispatch for loading
//! - [`scene`] — root container, update sweep, document boundary
//!
//! ## Quick Start
//!
//! ```
//! use askr::prelude::*;
//!
//! let mut scene = Scene::new();
//! let sun = scene.create_node("Sun");
//! let earth = scene.create_child_node(&sun, "Earth");
//!
//! sun.transform().unwrap().set_local_scale(Vec3::splat(2.0));
//! earth.transform().unwrap().set_local_position(Vec3::new(10.0, 0.0, 0.0));
//!
//! // child offsets are scaled by the parent's world scale
//! assert_eq!(
//!     earth.transform().unwrap().world_position(),
//!     Vec3::new(20.0, 0.0, 0.0),
//! );
//!
//! let saved = scene.to_value().unwrap();
//! let mut restored = Scene::new();
//! restored.load_value(&saved).unwrap();
//! assert_eq!(restored.node_count(), 2);
//! ```
//!
//! [`Node`]: node::Node
//! [`Component`]: component::Component
//! [`Scene`]: scene::Scene
//! [`Vec3`]: math::Vec3
//! [`SceneError`]: error::SceneError
//! [`OwnerLink`]: component::OwnerLink

pub mod component;
pub mod doc;
pub mod error;
pub mod math;
pub mod node;
pub mod prelude;
pub mod registry;
pub mod scene;
pub mod transform;

pub use component::Component;
pub use error::SceneError;
pub use math::Vec3;
pub use node::Node;
pub use registry::ComponentRegistry;
pub use scene::Scene;
pub use transform::Transform;
