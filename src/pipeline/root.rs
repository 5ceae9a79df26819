//! Root Host - Owner of the canonical top-level entries.
//!
//! The root host holds the application state in a signal. It renders one
//! top-level composite seeded from that state and is the terminus of the
//! report chain: every report that reaches it replaces the state wholesale.
//! Writing the signal is how it tells the view host to re-render; anything
//! subscribed with an `effect` (see [`mount`](super::mount)) re-runs.
//!
//! # Example
//!
//! ```ignore
//! use spark_tree::{RootHost, seed_data};
//!
//! let root = RootHost::new(seed_data())?;
//! root.activate();
//! assert_eq!(root.change_count(), 4);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, info};

use crate::error::TreeError;
use crate::primitives::CompositeUnit;
use crate::types::Entries;

/// Holds the top-level entries and the unit tree rendered from them.
pub struct RootHost {
    nodes: Signal<Entries>,
    tree: CompositeUnit,
    changes: Rc<Cell<usize>>,
}

impl RootHost {
    /// Create the host and its (unmounted) top-level composite.
    pub fn new(seed: Entries) -> Result<Self, TreeError> {
        let nodes = signal(seed.clone());
        let changes = Rc::new(Cell::new(0));

        let nodes_for_tree = nodes.clone();
        let changes_for_tree = changes.clone();
        let tree = CompositeUnit::new(seed, move |entries| {
            replace_state(&nodes_for_tree, &changes_for_tree, entries);
        })?;

        info!(root = %tree.id(), "root host created");
        Ok(Self {
            nodes,
            tree,
            changes,
        })
    }

    /// Mount the top-level composite. Leaves report as they activate.
    ///
    /// Returns false if already active.
    pub fn activate(&self) -> bool {
        let activated = self.tree.activate();
        if activated {
            info!(changes = self.change_count(), "tree activated");
        }
        activated
    }

    /// Replace the held entries and signal a re-render.
    pub fn on_change(&self, entries: Entries) {
        replace_state(&self.nodes, &self.changes, entries);
    }

    /// Current canonical entries.
    pub fn entries(&self) -> Entries {
        self.nodes.get()
    }

    /// The state signal, for view hosts that subscribe to it.
    pub fn signal(&self) -> Signal<Entries> {
        self.nodes.clone()
    }

    /// The top-level composite.
    pub fn tree(&self) -> &CompositeUnit {
        &self.tree
    }

    /// How many times the state has been replaced.
    pub fn change_count(&self) -> usize {
        self.changes.get()
    }
}

fn replace_state(nodes: &Signal<Entries>, changes: &Cell<usize>, entries: Entries) {
    changes.set(changes.get() + 1);
    debug!(change = changes.get(), entries = entries.len(), "root state replaced");
    nodes.set(entries);
}
