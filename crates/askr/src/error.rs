//! Error types for the scene document boundary.

use thiserror::Error;

/// Everything that can go wrong when loading a scene or rewiring the tree.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The document itself failed to parse into the expected shape.
    #[error("invalid scene document: {0}")]
    Document(#[from] serde_json::Error),

    /// A component payload was missing a required key (or held the wrong
    /// JSON type under it). Partial spatial state is never filled in from
    /// defaults, so this is a hard stop.
    #[error("missing field `{0}` in component data")]
    MissingField(&'static str),

    /// Reparenting was refused because it would have made a node its own
    /// ancestor.
    #[error("reparenting would make the node its own ancestor")]
    CyclicHierarchy,
}
