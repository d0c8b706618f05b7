//! Character-offset string utilities
//!
//! Everything the editor exposes (cursor, selection, link spans) is measured
//! in characters, because that is what egui's `CCursor` counts. Rust slices
//! by byte, so these helpers translate between the two.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::{byte_to_char, char_to_byte};
//!
//! let text = "Hei på deg"; // 'å' is 2 bytes
//! assert_eq!(char_to_byte(text, 6), 7);
//! assert_eq!(byte_to_char(text, 7), 6);
//! ```

/// Number of characters in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the character at `char_index`.
///
/// Indices past the end clamp to `s.len()`.
#[inline]
pub fn char_to_byte(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Character index of the byte offset `byte_index`.
///
/// A byte offset inside a multi-byte character counts that character as
/// already passed. Offsets past the end clamp to the character count.
#[inline]
pub fn byte_to_char(s: &str, byte_index: usize) -> usize {
    s.char_indices()
        .take_while(|(byte, _)| *byte < byte_index)
        .count()
}

/// Slice `s` by character range, clamping both ends.
#[inline]
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let start = char_to_byte(s, start);
    let end = char_to_byte(s, end);
    if start >= end {
        return "";
    }
    &s[start..end]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
