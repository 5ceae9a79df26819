//! Engine - Unit registry.
//!
//! Units are not tracked by pointer. Every live unit has a [`UnitId`] handed
//! out by the registry, together with its kind and the unit that created it:
//!
//! ```text
//! u0: Composite (parent=None)
//! u1: Leaf      (parent=u0)
//! u2: Composite (parent=u0)
//! u3: Leaf      (parent=u2)
//! ```
//!
//! Identity checks (does a re-render keep the same unit?) compare ids.
//!
//! [`UnitId`]: crate::types::UnitId

mod registry;

pub use registry::*;
