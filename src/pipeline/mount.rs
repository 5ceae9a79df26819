//! Mount API - The render effect that acts as view host.
//!
//! `mount()` subscribes an effect to the root host's state signal. Each run
//! of the effect is one render pass:
//!
//! ```text
//! root signal -> compute_layout -> paint -> FrameSink::present
//! ```
//!
//! The core never calls this directly; it only writes the signal.
//!
//! # Example
//!
//! ```ignore
//! use spark_tree::{mount, MemorySink, RootHost, Viewport, seed_data};
//!
//! let root = RootHost::new(seed_data())?;
//! let sink = MemorySink::new();
//! let handle = mount(&root, sink.clone(), Viewport::inline(40));
//!
//! root.activate();                       // one render pass per root change
//! assert_eq!(handle.frame_count(), 5);   // initial + 4 reports
//!
//! handle.unmount();
//! ```

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::effect;
use tracing::{trace, warn};

use crate::error::TreeError;
use crate::layout::compute_layout;
use crate::renderer::{FrameBuffer, FrameSink, paint};
use crate::types::Entries;

use super::root::RootHost;

/// Space a render pass may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    /// None lets the frame grow with the content.
    pub max_height: Option<u16>,
}

impl Viewport {
    /// Fixed width, height follows the content.
    pub fn inline(width: u16) -> Self {
        Self {
            width,
            max_height: None,
        }
    }

    /// Fixed width and height.
    pub fn fixed(width: u16, height: u16) -> Self {
        Self {
            width,
            max_height: Some(height),
        }
    }
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by mount() that allows unmounting.
pub struct MountHandle {
    stop_effect: Option<Box<dyn FnOnce()>>,
    frames: Rc<Cell<usize>>,
}

impl MountHandle {
    /// Stop the render effect.
    pub fn unmount(mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }

    /// Number of frames presented so far.
    pub fn frame_count(&self) -> usize {
        self.frames.get()
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Render the tree held by `root` into `sink`, now and on every state change.
///
/// Failures inside a render pass are logged and the pass is skipped; they
/// never reach the propagation chain.
pub fn mount<S: FrameSink + 'static>(root: &RootHost, mut sink: S, viewport: Viewport) -> MountHandle {
    let nodes = root.signal();
    let frames = Rc::new(Cell::new(0));
    let frames_for_effect = frames.clone();

    let stop = effect(move || {
        // Read from signal (creates dependency)
        let entries = nodes.get();

        let frame = match render_frame(&entries, viewport) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "render pass failed");
                return;
            }
        };

        if let Err(err) = sink.present(&frame) {
            warn!(%err, "present failed");
            return;
        }
        frames_for_effect.set(frames_for_effect.get() + 1);
        trace!(frame = frames_for_effect.get(), "frame presented");
    });

    MountHandle {
        stop_effect: Some(Box::new(stop)),
        frames,
    }
}

/// One render pass without a sink: layout plus paint.
pub fn render_frame(entries: &Entries, viewport: Viewport) -> Result<FrameBuffer, TreeError> {
    let layout = compute_layout(entries, viewport.width, viewport.max_height)?;
    Ok(paint(&layout, layout.content_width, layout.content_height))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::model::{seed_data, values_json};
    use crate::renderer::MemorySink;
    use serde_json::json;
    use std::io;

    /// Sink whose terminal is gone.
    struct BrokenSink;

    impl FrameSink for BrokenSink {
        fn present(&mut self, _frame: &FrameBuffer) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_mount_renders_initial_state() {
        reset_registry();

        let root = RootHost::new(seed_data()).unwrap();
        let sink = MemorySink::new();
        let handle = mount(&root, sink.clone(), Viewport::inline(30));

        assert_eq!(handle.frame_count(), 1);
        let frame = sink.last_frame().unwrap();
        assert!(frame.to_lines().join("\n").contains("Andrew"));
    }

    #[test]
    fn test_each_root_change_renders() {
        reset_registry();

        let root = RootHost::new(seed_data()).unwrap();
        let sink = MemorySink::new();
        let handle = mount(&root, sink.clone(), Viewport::inline(30));

        root.activate();

        assert_eq!(handle.frame_count(), 1 + root.change_count());
        let text = sink.last_frame().unwrap().to_lines().join("\n");
        assert!(text.contains("AndrewAndrew"));
        assert!(text.contains("ErickErick"));
    }

    #[test]
    fn test_unmount_stops_rendering() {
        reset_registry();

        let root = RootHost::new(seed_data()).unwrap();
        let sink = MemorySink::new();
        let handle = mount(&root, sink.clone(), Viewport::inline(30));
        handle.unmount();

        root.activate();
        assert_eq!(sink.frame_count(), 1);
    }

    #[test]
    fn test_failed_present_does_not_stop_propagation() {
        reset_registry();

        let root = RootHost::new(seed_data()).unwrap();
        let handle = mount(&root, BrokenSink, Viewport::inline(30));

        root.activate();

        assert_eq!(
            values_json(&root.entries()),
            json!(["AndrewAndrew", "BrookeBrooke", ["DanDan", "ErickErick"]])
        );
        assert_eq!(root.change_count(), 4);
        assert_eq!(handle.frame_count(), 0);
    }

    #[test]
    fn test_fixed_viewport_clamps_height() {
        let frame = render_frame(&seed_data(), Viewport::fixed(30, 4)).unwrap();
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.width(), 30);
    }
}
