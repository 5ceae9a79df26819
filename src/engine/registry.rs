//! Unit Registry - Identity allocation for live units.
//!
//! Manages the lifecycle of unit identities:
//! - Monotonic id allocation (ids are never handed out twice)
//! - Kind and parent bookkeeping per live unit
//! - Parent context stack for nested unit creation
//! - Activation counter (how many units went Unmounted -> Active)

use std::cell::RefCell;
use std::collections::HashMap;

use crate::types::{NodeKind, UnitId};

/// Bookkeeping kept for every live unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInfo {
    pub kind: NodeKind,
    pub parent: Option<UnitId>,
}

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Live units by id.
    static UNITS: RefCell<HashMap<UnitId, UnitInfo>> = RefCell::new(HashMap::new());

    /// Next id to hand out.
    static NEXT_ID: RefCell<usize> = const { RefCell::new(0) };

    /// Stack of parent ids for nested unit creation.
    static PARENT_STACK: RefCell<Vec<UnitId>> = const { RefCell::new(Vec::new()) };

    /// Total activations since the last reset.
    static ACTIVATIONS: RefCell<usize> = const { RefCell::new(0) };
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Get the unit currently creating children (None at the root).
pub fn get_current_parent() -> Option<UnitId> {
    PARENT_STACK.with(|stack| stack.borrow().last().copied())
}

/// Push a parent id onto the stack.
pub fn push_parent_context(id: UnitId) {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().push(id);
    })
}

/// Pop a parent id from the stack.
pub fn pop_parent_context() {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    })
}

// =============================================================================
// Allocation
// =============================================================================

/// Allocate an id for a new unit. The parent is taken from the context stack.
pub fn allocate_unit(kind: NodeKind) -> UnitId {
    let id = NEXT_ID.with(|next| {
        let mut next = next.borrow_mut();
        let id = UnitId(*next);
        *next += 1;
        id
    });

    let parent = get_current_parent();
    UNITS.with(|units| {
        units.borrow_mut().insert(id, UnitInfo { kind, parent });
    });

    id
}

/// Release a unit id. Unknown ids are ignored.
pub fn release_unit(id: UnitId) {
    UNITS.with(|units| {
        units.borrow_mut().remove(&id);
    });
}

/// Record one Unmounted -> Active transition.
pub fn record_activation() {
    ACTIVATIONS.with(|count| *count.borrow_mut() += 1);
}

// =============================================================================
// Lookups
// =============================================================================

/// Check if a unit is currently alive.
pub fn is_allocated(id: UnitId) -> bool {
    UNITS.with(|units| units.borrow().contains_key(&id))
}

/// Bookkeeping for a live unit.
pub fn get_unit_info(id: UnitId) -> Option<UnitInfo> {
    UNITS.with(|units| units.borrow().get(&id).copied())
}

/// Parent of a live unit.
pub fn get_parent(id: UnitId) -> Option<UnitId> {
    get_unit_info(id).and_then(|info| info.parent)
}

/// Count of currently live units.
pub fn get_allocated_count() -> usize {
    UNITS.with(|units| units.borrow().len())
}

/// Total activations since the last reset.
pub fn get_activation_count() -> usize {
    ACTIVATIONS.with(|count| *count.borrow())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    UNITS.with(|units| units.borrow_mut().clear());
    NEXT_ID.with(|next| *next.borrow_mut() = 0);
    PARENT_STACK.with(|stack| stack.borrow_mut().clear());
    ACTIVATIONS.with(|count| *count.borrow_mut() = 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_unit() {
        reset_registry();

        let a = allocate_unit(NodeKind::Leaf);
        let b = allocate_unit(NodeKind::Composite);

        assert_eq!(a, UnitId(0));
        assert_eq!(b, UnitId(1));
        assert!(is_allocated(a));
        assert!(is_allocated(b));
        assert!(!is_allocated(UnitId(2)));
        assert_eq!(get_allocated_count(), 2);
        assert_eq!(get_unit_info(b).map(|info| info.kind), Some(NodeKind::Composite));
    }

    #[test]
    fn test_release_does_not_reuse() {
        reset_registry();

        let a = allocate_unit(NodeKind::Leaf);
        release_unit(a);
        assert!(!is_allocated(a));

        let b = allocate_unit(NodeKind::Leaf);
        assert_ne!(a, b);
        assert_eq!(get_allocated_count(), 1);
    }

    #[test]
    fn test_parent_context() {
        reset_registry();

        assert_eq!(get_current_parent(), None);

        let root = allocate_unit(NodeKind::Composite);
        push_parent_context(root);
        let child = allocate_unit(NodeKind::Leaf);
        assert_eq!(get_current_parent(), Some(root));

        pop_parent_context();
        assert_eq!(get_current_parent(), None);

        assert_eq!(get_parent(child), Some(root));
        assert_eq!(get_parent(root), None);
    }

    #[test]
    fn test_activation_counter() {
        reset_registry();

        record_activation();
        record_activation();
        assert_eq!(get_activation_count(), 2);

        reset_registry();
        assert_eq!(get_activation_count(), 0);
    }
}
