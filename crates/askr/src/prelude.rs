//! Convenience re-exports: `use askr::prelude::*;` pulls in everything a
//! typical scene-building application touches.

pub use crate::component::{Component, OwnerLink};
pub use crate::doc::{ComponentDoc, NodeDoc, SceneDoc};
pub use crate::error::SceneError;
pub use crate::math::Vec3;
pub use crate::node::Node;
pub use crate::registry::ComponentRegistry;
pub use crate::scene::Scene;
pub use crate::transform::Transform;
