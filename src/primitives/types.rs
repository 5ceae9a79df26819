//! Primitive types - callbacks and the live unit handle.

use std::rc::Rc;

use crate::types::{Entries, NodeKind, UnitId, UnitState};

use super::composite::CompositeUnit;
use super::leaf::LeafUnit;

// =============================================================================
// Report Callbacks
// =============================================================================

/// Callback a leaf uses to report its new value to its parent.
pub type LeafReport = Rc<dyn Fn(String)>;

/// Callback a composite uses to report its updated entries to its parent.
pub type EntriesReport = Rc<dyn Fn(Entries)>;

// =============================================================================
// Unit
// =============================================================================

/// A live unit: one of the two closed node shapes.
///
/// Cloning clones the handle, not the unit.
#[derive(Debug, Clone)]
pub enum Unit {
    Leaf(LeafUnit),
    Composite(CompositeUnit),
}

impl Unit {
    pub fn id(&self) -> UnitId {
        match self {
            Unit::Leaf(leaf) => leaf.id(),
            Unit::Composite(composite) => composite.id(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Unit::Leaf(_) => NodeKind::Leaf,
            Unit::Composite(_) => NodeKind::Composite,
        }
    }

    pub fn state(&self) -> UnitState {
        match self {
            Unit::Leaf(leaf) => leaf.state(),
            Unit::Composite(composite) => composite.state(),
        }
    }

    /// Run the Unmounted -> Active transition. Returns false if already active.
    pub fn activate(&self) -> bool {
        match self {
            Unit::Leaf(leaf) => leaf.activate(),
            Unit::Composite(composite) => composite.activate(),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafUnit> {
        match self {
            Unit::Leaf(leaf) => Some(leaf),
            Unit::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeUnit> {
        match self {
            Unit::Leaf(_) => None,
            Unit::Composite(composite) => Some(composite),
        }
    }
}
