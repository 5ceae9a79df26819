//! Error types.

use thiserror::Error;

use crate::types::{Key, NodeKind};

/// Errors raised while building or driving a tree.
///
/// Propagation itself is infallible; everything here is either a structural
/// problem caught at construction time or a boundary failure (seed file,
/// terminal, layout).
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("entry {key}: declared {declared} but payload is {found}")]
    StructuralMismatch {
        key: Key,
        declared: NodeKind,
        found: String,
    },

    #[error("duplicate sibling key: {key}")]
    DuplicateKey { key: Key },

    #[error("unknown key: {key}")]
    UnknownKey { key: Key },

    #[error("key missing from new order: {key}")]
    MissingKey { key: Key },

    #[error("invalid seed data: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("layout failed: {0}")]
    Layout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
