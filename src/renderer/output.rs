//! Frame sinks - Where finished frames go.
//!
//! - [`TerminalSink`] writes to a terminal through crossterm, either inline
//!   (rewrites its previous output in place, keeps scrollback) or fullscreen
//!   (alternate screen, only changed cells are written).
//! - [`MemorySink`] keeps every frame, for tests and for `--dump`-style use.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::{
    cursor::{Hide, MoveTo, MoveToColumn, MoveUp},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    },
};

use crate::types::{Attr, Cell};

use super::buffer::FrameBuffer;

/// Receives each frame produced by a render pass.
pub trait FrameSink {
    fn present(&mut self, frame: &FrameBuffer) -> io::Result<()>;
}

// =============================================================================
// Memory Sink
// =============================================================================

/// Collects frames. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    frames: Rc<RefCell<Vec<FrameBuffer>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last_frame(&self) -> Option<FrameBuffer> {
        self.frames.borrow().last().cloned()
    }
}

impl FrameSink for MemorySink {
    fn present(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        self.frames.borrow_mut().push(frame.clone());
        Ok(())
    }
}

// =============================================================================
// Terminal Sink
// =============================================================================

/// How a [`TerminalSink`] uses the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Normal buffer, output rewritten in place.
    Inline,
    /// Alternate screen, differential updates.
    Fullscreen,
}

/// Tracks the style last written so runs of equal cells share escapes.
#[derive(Debug, Default)]
struct StyleState {
    fg: Option<Color>,
    attrs: Option<Attr>,
}

impl StyleState {
    fn apply<W: Write>(&mut self, out: &mut W, cell: &Cell) -> io::Result<()> {
        if self.attrs != Some(cell.attrs) {
            queue!(out, SetAttribute(Attribute::Reset))?;
            if cell.attrs.contains(Attr::BOLD) {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if cell.attrs.contains(Attr::DIM) {
                queue!(out, SetAttribute(Attribute::Dim))?;
            }
            if cell.attrs.contains(Attr::ITALIC) {
                queue!(out, SetAttribute(Attribute::Italic))?;
            }
            if cell.attrs.contains(Attr::UNDERLINE) {
                queue!(out, SetAttribute(Attribute::Underlined))?;
            }
            self.attrs = Some(cell.attrs);
            // Attribute reset also drops the colour.
            self.fg = None;
        }
        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(cell.fg))?;
            self.fg = Some(cell.fg);
        }
        Ok(())
    }
}

/// Writes frames to a terminal-like writer.
pub struct TerminalSink<W: Write> {
    out: W,
    mode: RenderMode,
    previous: Option<FrameBuffer>,
    previous_height: u16,
    entered: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, mode: RenderMode) -> Self {
        Self {
            out,
            mode,
            previous: None,
            previous_height: 0,
            entered: false,
        }
    }

    fn render_inline(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        if self.previous_height > 0 {
            queue!(
                self.out,
                MoveUp(self.previous_height),
                MoveToColumn(0),
                Clear(ClearType::FromCursorDown)
            )?;
        }

        let mut style = StyleState::default();
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if let Some(cell) = frame.get(x, y) {
                    if cell.char == '\0' {
                        continue;
                    }
                    style.apply(&mut self.out, cell)?;
                    queue!(self.out, Print(cell.char))?;
                }
            }
            queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, Print("\r\n"))?;
            style = StyleState::default();
        }

        self.previous_height = frame.height();
        Ok(())
    }

    fn render_diff(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        if !self.entered {
            queue!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
            self.entered = true;
        }

        let same_size = self
            .previous
            .as_ref()
            .is_some_and(|prev| prev.width() == frame.width() && prev.height() == frame.height());
        if !same_size && self.previous.is_some() {
            queue!(self.out, Clear(ClearType::All))?;
        }

        let mut style = StyleState::default();
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let Some(cell) = frame.get(x, y) else { continue };
                let unchanged = same_size
                    && self
                        .previous
                        .as_ref()
                        .and_then(|prev| prev.get(x, y))
                        .is_some_and(|prev| prev == cell);
                if unchanged || cell.char == '\0' {
                    continue;
                }
                style.apply(&mut self.out, cell)?;
                queue!(self.out, MoveTo(x, y), Print(cell.char))?;
            }
        }
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;

        self.previous = Some(frame.clone());
        Ok(())
    }

    #[cfg(test)]
    fn written(&self) -> &W {
        &self.out
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn present(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        match self.mode {
            RenderMode::Inline => self.render_inline(frame)?,
            RenderMode::Fullscreen => self.render_diff(frame)?,
        }
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}
