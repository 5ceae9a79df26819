//! Paint - Computed layout to frame buffer.
//!
//! Styling is decorative only:
//! - Composites: single-line dim border, `#key` caption in the top edge
//! - Leaves: rounded cyan border, bold label inside

use crossterm::style::Color;

use crate::layout::{BoxRole, ComputedLayout, string_width};
use crate::types::Attr;

use super::buffer::{BorderStyle, FrameBuffer};

/// Draw every box of `layout` into a buffer of the given size.
pub fn paint(layout: &ComputedLayout, width: u16, height: u16) -> FrameBuffer {
    let mut buffer = FrameBuffer::new(width, height);

    for b in &layout.boxes {
        match b.role {
            BoxRole::Root => {}
            BoxRole::Composite => {
                buffer.draw_border(
                    b.x,
                    b.y,
                    b.width,
                    b.height,
                    BorderStyle::Single,
                    Color::DarkGrey,
                    Attr::DIM,
                );
                if let Some(label) = &b.label {
                    let caption = format!(" {label} ");
                    if b.width > string_width(&caption) + 2 {
                        buffer.draw_text(
                            b.x + 2,
                            b.y,
                            &caption,
                            b.width - 4,
                            Color::DarkGrey,
                            Attr::DIM,
                        );
                    }
                }
            }
            BoxRole::Leaf => {
                buffer.draw_border(
                    b.x,
                    b.y,
                    b.width,
                    b.height,
                    BorderStyle::Rounded,
                    Color::Cyan,
                    Attr::NONE,
                );
                if let Some(label) = &b.label {
                    if b.width > 4 && b.height > 2 {
                        buffer.draw_text(
                            b.x + 2,
                            b.y + 1,
                            label,
                            b.width - 4,
                            Color::Reset,
                            Attr::BOLD,
                        );
                    }
                }
            }
        }
    }

    buffer
}
