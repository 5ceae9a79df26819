//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells that represents what should be
//! displayed. All drawing operations work on this buffer and clip silently
//! at its edges.
//!
//! Storage is flat, row-major: `index = y * width + x`.

use crossterm::style::Color;

use unicode_segmentation::UnicodeSegmentation;

use crate::layout::{grapheme_width, truncate_to_width};
use crate::types::{Attr, Cell};

// =============================================================================
// Border Styles
// =============================================================================

/// Box-drawing character sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Single,
    Rounded,
}

impl BorderStyle {
    /// (top-left, top-right, bottom-left, bottom-right, horizontal, vertical)
    fn chars(self) -> (char, char, char, char, char, char) {
        match self {
            BorderStyle::Single => ('┌', '┐', '└', '┘', '─', '│'),
            BorderStyle::Rounded => ('╭', '╮', '╰', '╯', '─', '│'),
        }
    }
}

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Set a single cell. Returns false if out of bounds.
    pub fn set_cell(&mut self, x: u16, y: u16, char: char, fg: Color, attrs: Attr) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = Cell { char, fg, attrs };
        true
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Draw a box outline. Boxes smaller than 2x2 are skipped.
    pub fn draw_border(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        style: BorderStyle,
        fg: Color,
        attrs: Attr,
    ) {
        if width < 2 || height < 2 {
            return;
        }
        let (tl, tr, bl, br, h, v) = style.chars();
        let right = x + width - 1;
        let bottom = y + height - 1;

        self.set_cell(x, y, tl, fg, attrs);
        self.set_cell(right, y, tr, fg, attrs);
        self.set_cell(x, bottom, bl, fg, attrs);
        self.set_cell(right, bottom, br, fg, attrs);

        for col in x + 1..right {
            self.set_cell(col, y, h, fg, attrs);
            self.set_cell(col, bottom, h, fg, attrs);
        }
        for row in y + 1..bottom {
            self.set_cell(x, row, v, fg, attrs);
            self.set_cell(right, row, v, fg, attrs);
        }
    }

    /// Draw a single line of text, cut to `max_width` cells.
    ///
    /// Text is walked by grapheme cluster; a cell keeps the cluster's base
    /// character. Wide clusters occupy two cells; the second holds a NUL
    /// continuation marker that renderers skip.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, max_width: u16, fg: Color, attrs: Attr) {
        let mut col = x;
        for grapheme in truncate_to_width(text, max_width).graphemes(true) {
            let w = grapheme_width(grapheme);
            let Some(c) = grapheme.chars().next() else { continue };
            if w == 0 {
                continue;
            }
            self.set_cell(col, y, c, fg, attrs);
            if w == 2 {
                self.set_cell(col + 1, y, '\0', fg, attrs);
            }
            col = col.saturating_add(w);
        }
    }

    /// Plain-text rows with trailing spaces trimmed.
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                let row: String = (0..self.width)
                    .filter_map(|x| self.get(x, y))
                    .map(|cell| cell.char)
                    .filter(|&c| c != '\0')
                    .collect();
                row.trim_end().to_string()
            })
            .collect()
    }
}
