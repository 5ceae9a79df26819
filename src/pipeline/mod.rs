//! Pipeline - Root state and the render effect.
//!
//! - [`RootHost`] owns the canonical entries in a signal
//! - [`mount`] subscribes a render effect to that signal

mod mount;
mod root;

pub use mount::{mount, render_frame, MountHandle, Viewport};
pub use root::RootHost;
