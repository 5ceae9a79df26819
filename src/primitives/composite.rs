//! Composite Unit - One level of the tree.
//!
//! A composite owns a local copy of its entries, renders one child unit per
//! entry, merges child reports into its copy and reports the result upward.
//!
//! # Local state
//!
//! Entries are seeded once at construction. After that the local copy is the
//! source of truth: entries re-supplied by the parent ([`CompositeUnit::receive_entries`])
//! are ignored. The copy is never patched in place; every change builds a new
//! vector (a shallow `Rc` copy with one position swapped) and replaces it.
//!
//! # Child reports
//!
//! A report from the child at position `i`:
//! 1. Clone the local entries (shallow)
//! 2. Replace index `i` with the old entry's key and the reported payload
//! 3. Commit the new vector locally
//! 4. Report it upward (so the parent sees the just-applied patch)
//! 5. Re-render the children
//!
//! # Rendering
//!
//! Children are matched to entries by key, like `each()` list rendering:
//! - New keys: create a unit and activate it
//! - Existing keys: update props, rebind the position (NO unit recreation!)
//!
//! Keys and kinds never change after creation (reports keep both, reorder is
//! a permutation), so there is nothing to tear down between passes.
//!
//! Reports that arrive while a render pass is running (children activating
//! during the pass) mark the pass as stale; it is repeated once the current
//! pass finishes.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, instrument, trace, warn};

use crate::engine::{
    allocate_unit, pop_parent_context, push_parent_context, record_activation, release_unit,
};
use crate::error::TreeError;
use crate::model::validate;
use crate::types::{Entries, Key, NodeKind, NodeValue, Payload, UnitId, UnitState};

use super::leaf::LeafUnit;
use super::types::{EntriesReport, Unit};

/// Handle to a live composite. Clones share the same unit.
#[derive(Clone)]
pub struct CompositeUnit {
    inner: Rc<CompositeInner>,
}

/// A rendered child and the position its report callback is bound to.
struct ChildSlot {
    unit: Unit,
    position: Rc<Cell<usize>>,
}

struct CompositeInner {
    id: UnitId,
    state: Cell<UnitState>,
    entries: RefCell<Entries>,
    children: RefCell<HashMap<Key, ChildSlot>>,
    report: EntriesReport,
    rendering: Cell<bool>,
    stale: Cell<bool>,
    renders: Cell<usize>,
}

impl Drop for CompositeInner {
    fn drop(&mut self) {
        release_unit(self.id);
    }
}

// =============================================================================
// Public API
// =============================================================================

impl CompositeUnit {
    /// Create an unmounted composite seeded with `initial`.
    ///
    /// Fails fast on duplicate sibling keys anywhere below `initial`.
    pub fn new(initial: Entries, report: impl Fn(Entries) + 'static) -> Result<Self, TreeError> {
        validate(&initial)?;
        Ok(Self::from_validated(initial, Rc::new(report)))
    }

    /// Create a composite from entries that already passed validation.
    pub(crate) fn from_validated(initial: Entries, report: EntriesReport) -> Self {
        let id = allocate_unit(NodeKind::Composite);
        trace!(%id, entries = initial.len(), "composite created");
        Self {
            inner: Rc::new(CompositeInner {
                id,
                state: Cell::new(UnitState::Unmounted),
                entries: RefCell::new(initial),
                children: RefCell::new(HashMap::new()),
                report,
                rendering: Cell::new(false),
                stale: Cell::new(false),
                renders: Cell::new(0),
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

    /// Current local entries (shallow copy).
    pub fn entries(&self) -> Entries {
        self.inner.entries.borrow().clone()
    }

    /// Number of completed render passes.
    pub fn render_count(&self) -> usize {
        self.inner.renders.get()
    }

    /// Unmounted -> Active, then the first render (which activates children).
    ///
    /// Returns false if already active.
    #[instrument(level = "debug", skip(self), fields(id = %self.id()))]
    pub fn activate(&self) -> bool {
        if self.inner.state.get() == UnitState::Active {
            trace!("already active");
            return false;
        }
        self.inner.state.set(UnitState::Active);
        record_activation();
        CompositeInner::render(&self.inner);
        true
    }

    /// Entries re-supplied by the parent on its re-render.
    ///
    /// Ignored: local state was seeded once and stays authoritative.
    pub fn receive_entries(&self, entries: &Entries) {
        trace!(id = %self.id(), offered = entries.len(), "re-supplied entries ignored");
    }

    /// Permute the entries into `keys` order, then commit, report and re-render.
    ///
    /// `keys` must name every current key exactly once.
    pub fn reorder(&self, keys: &[Key]) -> Result<(), TreeError> {
        let next = {
            let entries = self.inner.entries.borrow();
            let by_key: HashMap<Key, &Rc<NodeValue>> =
                entries.iter().map(|entry| (entry.key(), entry)).collect();

            let mut seen = HashSet::with_capacity(keys.len());
            let mut next = Vec::with_capacity(entries.len());
            for &key in keys {
                if !seen.insert(key) {
                    return Err(TreeError::DuplicateKey { key });
                }
                let entry = by_key.get(&key).ok_or(TreeError::UnknownKey { key })?;
                next.push(Rc::clone(entry));
            }
            if let Some(missing) = entries.iter().find(|entry| !seen.contains(&entry.key())) {
                return Err(TreeError::MissingKey { key: missing.key() });
            }
            next
        };

        debug!(id = %self.id(), ?keys, "reorder");
        CompositeInner::commit(&self.inner, next);
        Ok(())
    }

    /// The live child unit rendered for `key`.
    pub fn child(&self, key: Key) -> Option<Unit> {
        self.inner
            .children
            .borrow()
            .get(&key)
            .map(|slot| slot.unit.clone())
    }

    /// Live children in entry order.
    pub fn children(&self) -> Vec<(Key, Unit)> {
        let entries = self.entries();
        let children = self.inner.children.borrow();
        entries
            .iter()
            .filter_map(|entry| {
                children
                    .get(&entry.key())
                    .map(|slot| (entry.key(), slot.unit.clone()))
            })
            .collect()
    }

    /// Ids of the live children in entry order.
    pub fn child_ids(&self) -> Vec<(Key, UnitId)> {
        self.children()
            .into_iter()
            .map(|(key, unit)| (key, unit.id()))
            .collect()
    }
}

impl fmt::Debug for CompositeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeUnit")
            .field("id", &self.inner.id)
            .field("state", &self.inner.state.get())
            .field("entries", &self.inner.entries.borrow().len())
            .finish()
    }
}

// =============================================================================
// Propagation and Rendering
// =============================================================================

impl CompositeInner {
    /// Merge a child's report into a fresh copy of the entries.
    fn apply_child_report(this: &Rc<Self>, position: usize, payload: Payload) {
        let next = {
            let entries = this.entries.borrow();
            let Some(previous) = entries.get(position) else {
                warn!(id = %this.id, position, "report from a position that no longer exists");
                return;
            };
            debug_assert_eq!(previous.kind(), payload.kind());

            let mut next = entries.clone();
            next[position] = Rc::new(previous.with_payload(payload));
            next
        };
        trace!(id = %this.id, position, "child report merged");
        Self::commit(this, next);
    }

    /// Replace local state, report upward, then re-render.
    fn commit(this: &Rc<Self>, next: Entries) {
        *this.entries.borrow_mut() = next.clone();
        (this.report)(next);
        if this.state.get() == UnitState::Active {
            Self::render(this);
        }
    }

    fn render(this: &Rc<Self>) {
        if this.rendering.replace(true) {
            this.stale.set(true);
            return;
        }
        loop {
            this.stale.set(false);
            Self::reconcile(this);
            this.renders.set(this.renders.get() + 1);
            if !this.stale.get() {
                break;
            }
        }
        this.rendering.set(false);
    }

    fn reconcile(this: &Rc<Self>) {
        // Snapshot so child activations can commit while we iterate.
        let snapshot = this.entries.borrow().clone();

        push_parent_context(this.id);

        for (position, entry) in snapshot.iter().enumerate() {
            let key = entry.key();
            let existing = this
                .children
                .borrow()
                .get(&key)
                .map(|slot| (slot.unit.clone(), Rc::clone(&slot.position)));

            match existing {
                Some((unit, slot_position)) => {
                    // EXISTING child - rebind position, pass props
                    slot_position.set(position);
                    match (&unit, entry.payload()) {
                        (Unit::Leaf(leaf), Payload::Leaf(text)) => leaf.set_value(text.as_str()),
                        (Unit::Composite(composite), Payload::Composite(children)) => {
                            composite.receive_entries(children)
                        }
                        _ => {}
                    }
                }
                None => {
                    // NEW child - create and activate
                    let slot_position = Rc::new(Cell::new(position));
                    let unit = Self::create_child(this, entry, Rc::clone(&slot_position));
                    this.children.borrow_mut().insert(
                        key,
                        ChildSlot {
                            unit: unit.clone(),
                            position: slot_position,
                        },
                    );
                    unit.activate();
                }
            }
        }

        pop_parent_context();
    }

    fn create_child(this: &Rc<Self>, entry: &NodeValue, position: Rc<Cell<usize>>) -> Unit {
        let parent: Weak<Self> = Rc::downgrade(this);
        match entry.payload() {
            Payload::Leaf(text) => {
                let report = move |value: String| {
                    if let Some(parent) = parent.upgrade() {
                        Self::apply_child_report(&parent, position.get(), Payload::Leaf(value));
                    }
                };
                Unit::Leaf(LeafUnit::with_report(text.clone(), Rc::new(report)))
            }
            Payload::Composite(children) => {
                let report = move |entries: Entries| {
                    if let Some(parent) = parent.upgrade() {
                        Self::apply_child_report(
                            &parent,
                            position.get(),
                            Payload::Composite(entries),
                        );
                    }
                };
                Unit::Composite(CompositeUnit::from_validated(children.clone(), Rc::new(report)))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
