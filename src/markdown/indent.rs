//! Block indentation for selected text
//!
//! [`transform`] takes a selection in the form a rich text selection reports
//! it: line breaks replaced by [`LINE_BREAK_SENTINEL`]. That form cannot tell
//! a line break from a literal U+201A (the low-9 quote used in German and
//! Czech text), so the editor itself goes through [`indent_range`], which
//! works on real `\n` line starts.
//!
//! # Example
//! ```ignore
//! let selected = encode_line_breaks("one\ntwo");
//! assert_eq!(transform(&selected, false).unwrap(), "\tone\n\ttwo");
//! ```

use crate::string_utils::char_len;

/// Stand-in for a line break inside selected text (U+201A, `e2 80 9a`).
#[allow(dead_code)]
pub const LINE_BREAK_SENTINEL: char = '\u{201a}';

const TAB: char = '\t';

/// Replacement text for a selection plus the range it occupies once inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentResult {
    /// Text that replaces the selection
    pub text: String,
    /// Character range `(start, end)` covering exactly `text`
    pub selection: (usize, usize),
}

/// Encode real line breaks as the sentinel.
#[allow(dead_code)]
pub fn encode_line_breaks(text: &str) -> String {
    text.replace('\n', &LINE_BREAK_SENTINEL.to_string())
}

/// Turn any sentinel left in transformed text back into a line break.
#[allow(dead_code)]
pub fn decode_line_breaks(text: &str) -> String {
    text.replace(LINE_BREAK_SENTINEL, "\n")
}

/// Indent (`reverse == false`) or outdent (`reverse == true`) selected text
/// in sentinel form.
///
/// Indenting puts a tab after every encoded line break and at the very
/// start, then drops one tab from the very end so a selection that stops on
/// a line boundary does not reach into the following line.
///
/// Outdenting turns every encoded break followed by a tab into a plain
/// `\n` and drops one leading tab. Breaks not followed by a tab stay
/// encoded.
///
/// Returns `None` for empty input.
#[allow(dead_code)]
pub fn transform(selected: &str, reverse: bool) -> Option<String> {
    shift_lines(selected, LINE_BREAK_SENTINEL, reverse)
}

/// Transform a selection that begins at character offset `start`.
///
/// `selected` holds real `\n` line breaks; every other character, U+201A
/// included, is kept as is. The new range covers the whole replacement, so
/// pressing Tab again re-indents the same block.
pub fn indent_range(start: usize, selected: &str, reverse: bool) -> Option<IndentResult> {
    let text = shift_lines(selected, '\n', reverse)?;
    let end = start + char_len(&text);
    Some(IndentResult {
        text,
        selection: (start, end),
    })
}

/// Add or remove one leading tab per line, where lines are separated by
/// `separator`. Lines that gain or lose a tab are rejoined with `\n`; on
/// outdent a line without a tab keeps its original separator.
fn shift_lines(selected: &str, separator: char, reverse: bool) -> Option<String> {
    if selected.is_empty() {
        return None;
    }

    let mut text = String::with_capacity(selected.len() + 8);
    for (i, line) in selected.split(separator).enumerate() {
        let stripped = line.strip_prefix(TAB);
        if i > 0 {
            if reverse && stripped.is_none() {
                text.push(separator);
            } else {
                text.push('\n');
            }
        }
        if reverse {
            text.push_str(stripped.unwrap_or(line));
        } else {
            text.push(TAB);
            text.push_str(line);
        }
    }

    if !reverse && text.ends_with(TAB) {
        text.pop();
    }
    Some(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
