//! Text buffer with an anchored selection
//!
//! The editor's working model of one document: the text plus a selection
//! stored as `anchor` (where it started) and `cursor` (where it ends up).
//! All offsets are character indices, matching egui's `CCursor`.

use crate::markdown::indent_range;
use crate::string_utils::{char_len, char_slice, char_to_byte};
use log::debug;

/// The line of text containing a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Line contents without the trailing `\n`
    pub text: &'a str,
    /// Character offset of the first character of the line
    pub start: usize,
}

/// Owned text plus selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    anchor: usize,
    cursor: usize,
}

impl TextBuffer {
    /// Create a buffer with the cursor at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: 0,
            cursor: 0,
        }
    }

    /// Create a buffer with a selection; offsets are clamped to the text.
    pub fn with_selection(text: impl Into<String>, anchor: usize, cursor: usize) -> Self {
        let mut buffer = Self::new(text);
        buffer.set_selection(anchor, cursor);
        buffer
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn len_chars(&self) -> usize {
        char_len(&self.text)
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selection as an ordered `(start, end)` pair.
    pub fn selection(&self) -> (usize, usize) {
        if self.anchor <= self.cursor {
            (self.anchor, self.cursor)
        } else {
            (self.cursor, self.anchor)
        }
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    pub fn set_selection(&mut self, anchor: usize, cursor: usize) {
        let len = self.len_chars();
        self.anchor = anchor.min(len);
        self.cursor = cursor.min(len);
    }

    /// Collapse the selection to `position`.
    pub fn set_cursor(&mut self, position: usize) {
        self.set_selection(position, position);
    }

    /// The selected text.
    pub fn selected_text(&self) -> &str {
        let (start, end) = self.selection();
        char_slice(&self.text, start, end)
    }

    /// Character at `index`, if any.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.text.chars().nth(index)
    }

    /// Replace the selection with `replacement` and collapse the cursor
    /// after it. Returns the insertion end offset.
    pub fn replace_selection(&mut self, replacement: &str) -> usize {
        let (start, end) = self.selection();
        let byte_start = char_to_byte(&self.text, start);
        let byte_end = char_to_byte(&self.text, end);
        self.text.replace_range(byte_start..byte_end, replacement);

        let insertion_end = start + char_len(replacement);
        self.set_cursor(insertion_end);
        insertion_end
    }

    /// Delete the characters in `[start, end)`.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let byte_start = char_to_byte(&self.text, start);
        let byte_end = char_to_byte(&self.text, end);
        if byte_start < byte_end {
            self.text.replace_range(byte_start..byte_end, "");
        }
        let len = self.len_chars();
        self.anchor = self.anchor.min(len);
        self.cursor = self.cursor.min(len);
    }

    /// The line containing the cursor.
    pub fn block_at_cursor(&self) -> Block<'_> {
        let byte_cursor = char_to_byte(&self.text, self.cursor);
        let byte_start = self.text[..byte_cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let byte_end = self.text[byte_cursor..]
            .find('\n')
            .map(|i| byte_cursor + i)
            .unwrap_or(self.text.len());

        Block {
            text: &self.text[byte_start..byte_end],
            start: char_len(&self.text[..byte_start]),
        }
    }

    /// Cursor offset from the start of its line.
    pub fn cursor_in_block(&self) -> usize {
        self.cursor - self.block_at_cursor().start
    }

    /// Indent (`reverse == false`) or outdent the selection.
    ///
    /// With a selection, the transformed text replaces it and stays selected
    /// with the cursor on its left edge. Without one, outdent removes a tab
    /// directly before the cursor, or failing that directly after it.
    ///
    /// Returns `true` if the text changed.
    pub fn indent_selection(&mut self, reverse: bool) -> bool {
        if self.has_selection() {
            let (start, _) = self.selection();
            let Some(result) = indent_range(start, self.selected_text(), reverse) else {
                return false;
            };
            self.replace_selection(&result.text);
            let (new_start, new_end) = result.selection;
            self.anchor = new_end;
            self.cursor = new_start;
            debug!(
                "{} selection, now {}..{}",
                if reverse { "Outdented" } else { "Indented" },
                new_start,
                new_end
            );
            return true;
        }

        if !reverse {
            return false;
        }

        let position = self.cursor;
        let tab_at = if position > 0 && self.char_at(position - 1) == Some('\t') {
            Some(position - 1)
        } else if self.char_at(position) == Some('\t') {
            Some(position)
        } else {
            None
        };

        match tab_at {
            Some(index) => {
                self.delete_range(index, index + 1);
                self.set_cursor(index);
                debug!("Removed tab at {}", index);
                true
            }
            None => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::indent::LINE_BREAK_SENTINEL;

    #[test]
    fn test_new_buffer_cursor_at_start() {
        let buffer = TextBuffer::new("hello");
        assert_eq!(buffer.cursor(), 0);
        assert!(!buffer.has_selection());
    }

    #[test]
    fn test_selection_is_clamped_and_ordered() {
        let buffer = TextBuffer::with_selection("hello", 99, 2);
        assert_eq!(buffer.anchor(), 5);
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(buffer.selection(), (2, 5));
    }

    #[test]
    fn test_selected_text_keeps_line_breaks() {
        let buffer = TextBuffer::with_selection("one\ntwo\nthree", 7, 0);
        assert_eq!(buffer.selected_text(), "one\ntwo");
    }

    #[test]
    fn test_replace_selection() {
        let mut buffer = TextBuffer::with_selection("Hei på deg", 4, 6);
        let end = buffer.replace_selection("til");
        assert_eq!(buffer.text(), "Hei til deg");
        assert_eq!(end, 7);
        assert_eq!(buffer.selection(), (7, 7));
    }

    #[test]
    fn test_block_at_cursor() {
        let mut buffer = TextBuffer::new("first\nsecond line\nthird");
        buffer.set_cursor(9);
        let block = buffer.block_at_cursor();
        assert_eq!(block.text, "second line");
        assert_eq!(block.start, 6);
        assert_eq!(buffer.cursor_in_block(), 3);
    }

    #[test]
    fn test_block_at_line_edges() {
        let mut buffer = TextBuffer::new("ab\ncd");
        buffer.set_cursor(2); // end of first line
        assert_eq!(buffer.block_at_cursor().text, "ab");
        buffer.set_cursor(3); // start of second line
        assert_eq!(buffer.block_at_cursor().text, "cd");
        buffer.set_cursor(5);
        assert_eq!(buffer.cursor_in_block(), 2);
    }

    #[test]
    fn test_block_of_empty_buffer() {
        let buffer = TextBuffer::new("");
        assert_eq!(buffer.block_at_cursor(), Block { text: "", start: 0 });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Indentation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_indent_multiline_selection() {
        let mut buffer = TextBuffer::with_selection("a\nline1\nline2\nz", 2, 13);
        assert!(buffer.indent_selection(false));
        assert_eq!(buffer.text(), "a\n\tline1\n\tline2\nz");
        // cursor on the left, anchor on the right
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(buffer.anchor(), 15);
    }

    #[test]
    fn test_repeated_indent_reindents_same_block() {
        let mut buffer = TextBuffer::with_selection("line1\nline2", 0, 11);
        assert!(buffer.indent_selection(false));
        assert!(buffer.indent_selection(false));
        assert_eq!(buffer.text(), "\t\tline1\n\t\tline2");
        assert_eq!(buffer.selection(), (0, 15));
    }

    #[test]
    fn test_indent_then_outdent_restores_text() {
        let original = "line1\nline2\nline3";
        let mut buffer = TextBuffer::with_selection(original, 0, 17);
        assert!(buffer.indent_selection(false));
        assert!(buffer.indent_selection(true));
        assert_eq!(buffer.text(), original);
        assert_eq!(buffer.selection(), (0, 17));
    }

    #[test]
    fn test_indent_selection_ending_on_line_boundary() {
        let mut buffer = TextBuffer::with_selection("one\ntwo\nthree", 0, 8);
        assert!(buffer.indent_selection(false));
        assert_eq!(buffer.text(), "\tone\n\ttwo\nthree");
    }

    #[test]
    fn test_outdent_keeps_unindented_lines() {
        let mut buffer = TextBuffer::with_selection("\tone\ntwo", 0, 8);
        assert!(buffer.indent_selection(true));
        assert_eq!(buffer.text(), "one\ntwo");
        assert!(!buffer.text().contains(LINE_BREAK_SENTINEL));
    }

    #[test]
    fn test_indent_keeps_literal_low_quote() {
        let text = "Er sagte \u{201a}ja\u{2018}";
        let mut buffer = TextBuffer::with_selection(text, 0, char_len(text));
        assert!(buffer.indent_selection(false));
        assert_eq!(buffer.text(), "\tEr sagte \u{201a}ja\u{2018}");

        assert!(buffer.indent_selection(true));
        assert_eq!(buffer.text(), text);
    }

    #[test]
    fn test_outdent_keeps_low_quote_across_lines() {
        let text = "\t\u{201a}eins\u{2018}\n\t\u{201a}zwei\u{2018}";
        let mut buffer = TextBuffer::with_selection(text, 0, char_len(text));
        assert!(buffer.indent_selection(true));
        assert_eq!(buffer.text(), "\u{201a}eins\u{2018}\n\u{201a}zwei\u{2018}");
        assert_eq!(buffer.selection(), (0, 13));
    }

    #[test]
    fn test_indent_without_selection_is_noop() {
        let mut buffer = TextBuffer::new("text");
        buffer.set_cursor(2);
        assert!(!buffer.indent_selection(false));
        assert_eq!(buffer.text(), "text");
    }

    #[test]
    fn test_outdent_at_cursor_removes_tab_before() {
        let mut buffer = TextBuffer::new("\t\tword");
        buffer.set_cursor(2);
        assert!(buffer.indent_selection(true));
        assert_eq!(buffer.text(), "\tword");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_outdent_at_cursor_removes_tab_after() {
        let mut buffer = TextBuffer::new("ab\tcd");
        buffer.set_cursor(2);
        assert!(buffer.indent_selection(true));
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_outdent_at_cursor_prefers_tab_before() {
        let mut buffer = TextBuffer::new("a\t\tb");
        buffer.set_cursor(2);
        assert!(buffer.indent_selection(true));
        assert_eq!(buffer.text(), "a\tb");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_outdent_at_cursor_without_tab_is_noop() {
        let mut buffer = TextBuffer::new("plain");
        buffer.set_cursor(3);
        assert!(!buffer.indent_selection(true));
        assert_eq!(buffer.text(), "plain");
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn test_outdent_at_buffer_edges() {
        let mut buffer = TextBuffer::new("\tx");
        buffer.set_cursor(0);
        assert!(buffer.indent_selection(true));
        assert_eq!(buffer.text(), "x");

        let mut buffer = TextBuffer::new("x");
        buffer.set_cursor(1);
        assert!(!buffer.indent_selection(true));
    }
}
