//! Core types for spark-tree.
//!
//! These types define the foundation that everything builds on. A tree is an
//! ordered sequence of [`NodeValue`]s; each value is either a leaf holding a
//! string or a composite holding another sequence.
//!
//! Kind and payload can never disagree: the kind is derived from the
//! [`Payload`] variant instead of being stored next to it. The only place a
//! declared kind exists separately is at the boundary ([`NodeValue::try_new`],
//! seed JSON), and that is where mismatches are rejected.

use std::fmt;
use std::rc::Rc;

use crossterm::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::TreeError;

// =============================================================================
// Keys and Kinds
// =============================================================================

/// Sibling-unique identifier of an entry. Not globally unique.
pub type Key = i64;

/// An ordered sequence of node values at one tree level.
///
/// Entries are shared through `Rc`: cloning the vector is a shallow copy, so
/// untouched positions stay pointer-identical across updates.
pub type Entries = Vec<Rc<NodeValue>>;

/// Which of the two node shapes an entry has.
///
/// Serialized with the names used by the seed files (`"Node"` / `"Tree"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "Node", alias = "Leaf")]
    Leaf,
    #[serde(rename = "Tree", alias = "Composite")]
    Composite,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf => f.write_str("leaf"),
            NodeKind::Composite => f.write_str("composite"),
        }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// The value carried by an entry. The variant *is* the entry's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Terminal string value.
    Leaf(String),
    /// Nested ordered sequence.
    Composite(Entries),
}

impl Payload {
    /// Kind implied by this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            Payload::Leaf(_) => NodeKind::Leaf,
            Payload::Composite(_) => NodeKind::Composite,
        }
    }

    /// String value, if this is a leaf payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Leaf(text) => Some(text),
            Payload::Composite(_) => None,
        }
    }

    /// Child entries, if this is a composite payload.
    pub fn as_entries(&self) -> Option<&Entries> {
        match self {
            Payload::Leaf(_) => None,
            Payload::Composite(entries) => Some(entries),
        }
    }
}

// =============================================================================
// NodeValue
// =============================================================================

/// One entry of the tree: a key plus a payload.
///
/// Values are immutable. An update produces a fresh value via
/// [`NodeValue::with_payload`] that replaces the old one at its index.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeValue {
    key: Key,
    payload: Payload,
}

impl NodeValue {
    /// Create a leaf entry.
    pub fn leaf(key: Key, value: impl Into<String>) -> Self {
        Self {
            key,
            payload: Payload::Leaf(value.into()),
        }
    }

    /// Create a composite entry from already-shared children.
    pub fn composite(key: Key, entries: Entries) -> Self {
        Self {
            key,
            payload: Payload::Composite(entries),
        }
    }

    /// Create an entry whose kind is declared separately from its payload.
    ///
    /// Fails with [`TreeError::StructuralMismatch`] when the declaration does
    /// not match the payload's shape.
    pub fn try_new(key: Key, declared: NodeKind, payload: Payload) -> Result<Self, TreeError> {
        if payload.kind() != declared {
            return Err(TreeError::StructuralMismatch {
                key,
                declared,
                found: payload.kind().to_string(),
            });
        }
        Ok(Self { key, payload })
    }

    #[inline]
    pub fn key(&self) -> Key {
        self.key
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Copy of this entry with the payload replaced. The key is kept.
    pub fn with_payload(&self, payload: Payload) -> Self {
        Self {
            key: self.key,
            payload,
        }
    }
}

// =============================================================================
// Unit Lifecycle
// =============================================================================

/// Identity of a live unit, handed out by the registry.
///
/// Ids are never reused within a registry generation, so two units with the
/// same id are the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

/// Lifecycle of a unit. The only transition is `Unmounted -> Active`, once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitState {
    #[default]
    Unmounted,
    Active,
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
    }
}

// =============================================================================
// Cell - The atomic unit of terminal rendering
// =============================================================================

/// A single terminal cell.
///
/// The frame buffer is a grid of these; the renderer outputs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    pub fg: Color,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: Color::Reset,
            attrs: Attr::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_payload() {
        let leaf = NodeValue::leaf(1, "Andrew");
        assert_eq!(leaf.kind(), NodeKind::Leaf);
        assert_eq!(leaf.payload().as_text(), Some("Andrew"));

        let tree = NodeValue::composite(3, vec![Rc::new(leaf)]);
        assert_eq!(tree.kind(), NodeKind::Composite);
        assert_eq!(tree.payload().as_entries().map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_try_new_rejects_mismatch() {
        let err = NodeValue::try_new(7, NodeKind::Composite, Payload::Leaf("x".into()))
            .unwrap_err();
        match err {
            TreeError::StructuralMismatch { key, declared, .. } => {
                assert_eq!(key, 7);
                assert_eq!(declared, NodeKind::Composite);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(NodeValue::try_new(7, NodeKind::Leaf, Payload::Leaf("x".into())).is_ok());
    }

    #[test]
    fn test_with_payload_keeps_key() {
        let value = NodeValue::leaf(2, "Brooke");
        let next = value.with_payload(Payload::Leaf("BrookeBrooke".into()));
        assert_eq!(next.key(), 2);
        assert_eq!(next.payload().as_text(), Some("BrookeBrooke"));
        // original untouched
        assert_eq!(value.payload().as_text(), Some("Brooke"));
    }

    #[test]
    fn test_attr_combine() {
        let attrs = Attr::BOLD | Attr::DIM;
        assert!(attrs.contains(Attr::BOLD));
        assert!(!attrs.contains(Attr::ITALIC));
    }
}
