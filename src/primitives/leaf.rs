//! Leaf Unit - Terminal string-valued node.
//!
//! A leaf presents its value and, on its one activation, reports the value
//! concatenated with itself to its parent. Prop updates afterwards change
//! what is presented and nothing else.
//!
//! # Example
//!
//! ```ignore
//! use spark_tree::primitives::LeafUnit;
//!
//! let leaf = LeafUnit::new("Dan", |value| println!("reported {value}"));
//! leaf.activate();          // prints "reported DanDan"
//! leaf.activate();          // no-op, already active
//! leaf.set_value("DanDan"); // presented value only
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::engine::{allocate_unit, record_activation, release_unit};
use crate::types::{NodeKind, UnitId, UnitState};

use super::types::LeafReport;

/// Handle to a live leaf. Clones share the same unit.
#[derive(Clone)]
pub struct LeafUnit {
    inner: Rc<LeafInner>,
}

struct LeafInner {
    id: UnitId,
    value: RefCell<String>,
    state: Cell<UnitState>,
    report: LeafReport,
    reports: Cell<usize>,
}

impl Drop for LeafInner {
    fn drop(&mut self) {
        release_unit(self.id);
    }
}

impl LeafUnit {
    /// Create an unmounted leaf. The parent is taken from the registry's
    /// parent context.
    pub fn new(value: impl Into<String>, report: impl Fn(String) + 'static) -> Self {
        Self::with_report(value.into(), Rc::new(report))
    }

    pub(crate) fn with_report(value: String, report: LeafReport) -> Self {
        let id = allocate_unit(NodeKind::Leaf);
        trace!(%id, %value, "leaf created");
        Self {
            inner: Rc::new(LeafInner {
                id,
                value: RefCell::new(value),
                state: Cell::new(UnitState::Unmounted),
                report,
                reports: Cell::new(0),
            }),
        }
    }

    #[inline]
    pub fn id(&self) -> UnitId {
        self.inner.id
    }

    #[inline]
    pub fn state(&self) -> UnitState {
        self.inner.state.get()
    }

    /// The value currently presented.
    pub fn value(&self) -> String {
        self.inner.value.borrow().clone()
    }

    /// How many times this leaf has reported. Never more than one.
    pub fn report_count(&self) -> usize {
        self.inner.reports.get()
    }

    /// Unmounted -> Active. Reports `value + value` exactly once.
    ///
    /// Returns false (and reports nothing) if the leaf is already active.
    #[instrument(level = "debug", skip(self), fields(id = %self.id()))]
    pub fn activate(&self) -> bool {
        if self.inner.state.get() == UnitState::Active {
            trace!("already active");
            return false;
        }
        self.inner.state.set(UnitState::Active);
        record_activation();

        // The report can re-enter set_value through the parent's render,
        // so the borrow must be released first.
        let doubled = self.inner.value.borrow().repeat(2);
        debug!(value = %doubled, "leaf reporting");
        self.inner.reports.set(self.inner.reports.get() + 1);
        (self.inner.report)(doubled);
        true
    }

    /// Prop update from a re-render. Never reports.
    pub fn set_value(&self, value: impl Into<String>) {
        *self.inner.value.borrow_mut() = value.into();
    }
}

impl fmt::Debug for LeafUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafUnit")
            .field("id", &self.inner.id)
            .field("state", &self.inner.state.get())
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
