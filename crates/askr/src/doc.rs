//! Wire-format structs for scene documents.
//!
//! These mirror the on-disk JSON shape one-to-one:
//!
//! ```json
//! {
//!   "rootNodes": [
//!     {
//!       "name": "Sun",
//!       "active": true,
//!       "components": [{"type": "Transform", "data": {...}}],
//!       "children": [...]
//!     }
//!   ]
//! }
//! ```
//!
//! The top-level key stays camelCase for document compatibility. Component
//! payloads are opaque [`serde_json::Value`]s interpreted by the component
//! that owns them, so the outer document never needs to know every concrete
//! component type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A whole scene: an ordered list of root subtrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDoc {
    #[serde(rename = "rootNodes")]
    pub root_nodes: Vec<NodeDoc>,
}

/// One node and, recursively, its subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    pub name: String,
    pub active: bool,
    pub components: Vec<ComponentDoc>,
    pub children: Vec<NodeDoc>,
}

/// A tagged component payload. `type` is the component's stable tag;
/// `data` is whatever that component serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDoc {
    #[serde(rename = "type")]
    pub ty: String,
    pub data: Value,
}
