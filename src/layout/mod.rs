//! Layout - Nested container geometry.
//!
//! Uses Taffy's flexbox implementation to turn the tree into boxes:
//! composites are bordered column containers, leaves are bordered boxes
//! around a one-line label.

mod taffy_bridge;
mod text_measure;
mod types;

pub use taffy_bridge::compute_layout;
pub use text_measure::{grapheme_width, string_width, truncate_to_width};
pub use types::{BoxRole, ComputedLayout, LayoutBox};
