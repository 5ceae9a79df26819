//! Text Measurement
//!
//! Display width of labels in terminal cells. Uses Unicode East Asian Width
//! for single characters and grapheme cluster analysis for emoji sequences:
//!
//! - ASCII printable, Latin, Cyrillic: 1 cell
//! - CJK ideographs, fullwidth forms, emoji: 2 cells
//! - Control characters, combining marks, zero-width characters: 0 cells

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Display width of one character in terminal cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    // Terminals draw these emoji blocks wide regardless of their EAW class
    match c as u32 {
        0x2600..=0x27BF => 2,   // Misc Symbols, Dingbats (⚡ ✨)
        0x1F300..=0x1F5FF => 2, // Misc Symbols and Pictographs
        0x1F600..=0x1F64F => 2, // Emoticons
        0x1F680..=0x1F6FF => 2, // Transport and Map Symbols
        0x1F900..=0x1F9FF => 2, // Supplemental Symbols and Pictographs
        0x1FA70..=0x1FAFF => 2, // Symbols and Pictographs Extended-A
        _ => c.width().unwrap_or(0) as u16,
    }
}

/// Display width of one grapheme cluster.
///
/// Flags and emoji sequences (ZWJ, VS16, skin tone, keycap) are 2 cells;
/// a base character with combining marks takes the base's width.
pub fn grapheme_width(grapheme: &str) -> u16 {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if grapheme.len() == first.len_utf8() {
        return char_width(first);
    }

    // Regional indicator pair
    if (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }
    for c in chars {
        match c as u32 {
            0x200D | 0xFE0F | 0x20E3 | 0x1F3FB..=0x1F3FF => return 2,
            _ => {}
        }
    }
    char_width(first)
}

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    s.graphemes(true)
        .fold(0u16, |width, g| width.saturating_add(grapheme_width(g)))
}

/// Cut `s` so it fits in `max_width` cells. Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_width: u16) -> &str {
    let mut width = 0u16;
    for (offset, grapheme) in s.grapheme_indices(true) {
        let w = grapheme_width(grapheme);
        if width.saturating_add(w) > max_width {
            return &s[..offset];
        }
        width += w;
    }
    s
}
