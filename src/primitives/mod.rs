//! Tree Primitives - Unit building blocks.
//!
//! This module provides the two unit shapes:
//! - [`LeafUnit`] - Terminal node holding a string
//! - [`CompositeUnit`] - Container node holding an ordered sequence of entries
//!
//! # Architecture
//!
//! Each unit:
//! 1. Allocates an id from the registry (parent taken from the context stack)
//! 2. Starts `Unmounted`
//! 3. Is activated exactly once by whoever renders it
//! 4. Reports changes upward through the callback it was created with
//!
//! Rendering flows down (composite -> children), reports flow up
//! (leaf -> composite -> ... -> root).

mod composite;
mod leaf;
mod types;

pub use composite::CompositeUnit;
pub use leaf::LeafUnit;
pub use types::*;
