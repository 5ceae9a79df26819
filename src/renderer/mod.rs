//! Renderer - Frame buffer, painting and terminal output.
//!
//! ```text
//! ComputedLayout -> paint() -> FrameBuffer -> FrameSink::present()
//! ```

mod buffer;
mod output;
mod paint;

pub use buffer::{BorderStyle, FrameBuffer};
pub use output::{FrameSink, MemorySink, RenderMode, TerminalSink};
pub use paint::paint;
