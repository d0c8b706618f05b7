//! Markdown link detection and position resolution
//!
//! Recognizes the two link shapes people actually type into notes:
//!
//! - bracketed links: `[label](scheme://target)`
//! - autolinks: `<scheme://target>`
//!
//! A target must contain `://`, so `[x](relative.md)` is not a link here.
//! Both passes run over one block of text (a single line); `.` never crosses
//! a newline.

use crate::string_utils::{byte_to_char, char_len};
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use url::Url;

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

static BRACKETED_LINK: OnceLock<Regex> = OnceLock::new();
static ANGLE_LINK: OnceLock<Regex> = OnceLock::new();

fn bracketed_link() -> &'static Regex {
    BRACKETED_LINK.get_or_init(|| {
        Regex::new(r"(\[.*?\]\((.+?://.+?)\))").expect("bracketed link pattern is valid")
    })
}

fn angle_link() -> &'static Regex {
    ANGLE_LINK
        .get_or_init(|| Regex::new(r"(<(.+?://.+?)>)").expect("autolink pattern is valid"))
}

/// Patterns in scan order. Later passes overwrite earlier ones on key collision.
fn passes() -> [&'static Regex; 2] {
    [bracketed_link(), angle_link()]
}

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// One link occurrence with its position in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Full matched syntax, delimiters included (`[a](b)` or `<b>`)
    pub matched_text: String,
    /// Extracted target
    pub url: String,
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanning
// ─────────────────────────────────────────────────────────────────────────────

/// Collect every link in `text`, keyed by its matched text.
///
/// Identical matched text found twice maps once; the autolink pass runs
/// after the bracketed pass and wins a collision.
pub fn scan(text: &str) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    for re in passes() {
        for caps in re.captures_iter(text) {
            if let (Some(whole), Some(url)) = (caps.get(1), caps.get(2)) {
                links.insert(whole.as_str().to_string(), url.as_str().to_string());
            }
        }
    }
    links
}

/// Collect every link occurrence in `text` with character offsets.
///
/// Unlike [`scan`], duplicates are kept. Bracketed matches come first, then
/// autolinks, each in left-to-right order; an autolink nested inside a
/// bracketed link's label is reported by both passes.
pub fn scan_matches(text: &str) -> Vec<LinkMatch> {
    let mut matches = Vec::new();
    for re in passes() {
        for caps in re.captures_iter(text) {
            if let (Some(whole), Some(url)) = (caps.get(1), caps.get(2)) {
                matches.push(LinkMatch {
                    matched_text: whole.as_str().to_string(),
                    url: url.as_str().to_string(),
                    start: byte_to_char(text, whole.start()),
                    end: byte_to_char(text, whole.end()),
                });
            }
        }
    }
    matches
}

// ─────────────────────────────────────────────────────────────────────────────
// Position Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Find the link under character offset `position` in `text`.
///
/// Each link is located by the first occurrence of its matched text, and
/// both span ends count as inside. When several spans contain the position
/// the last one in key order wins. A repeated identical link further along
/// the line therefore never resolves.
///
/// Returns `None` when no span contains the position or the winning target
/// does not parse as a URL.
pub fn resolve_at_position(text: &str, position: usize) -> Option<Url> {
    let mut candidate: Option<String> = None;

    for (matched_text, url) in scan(text) {
        let Some(byte_start) = text.find(&matched_text) else {
            continue;
        };
        let start = byte_to_char(text, byte_start);
        let end = start + char_len(&matched_text);
        if position >= start && position <= end {
            candidate = Some(url);
        }
    }

    let candidate = candidate?;
    match Url::parse(&candidate) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!("Ignoring link target '{}': {}", candidate, e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(text: &str, position: usize) -> Option<String> {
        resolve_at_position(text, position).map(|u| u.to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // scan
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_scan_bracketed_link() {
        let links = scan("Check [this](http://example.com) out");
        assert_eq!(links.len(), 1);
        assert_eq!(
            links.get("[this](http://example.com)").map(String::as_str),
            Some("http://example.com")
        );
    }

    #[test]
    fn test_scan_angle_link() {
        let links = scan("See <http://example.com> now");
        assert_eq!(
            links.get("<http://example.com>").map(String::as_str),
            Some("http://example.com")
        );
    }

    #[test]
    fn test_scan_custom_scheme() {
        let links = scan("[todo](note://inbox/today) and <task://42>");
        assert_eq!(links["[todo](note://inbox/today)"], "note://inbox/today");
        assert_eq!(links["<task://42>"], "task://42");
    }

    #[test]
    fn test_scan_requires_scheme() {
        assert!(scan("[readme](README.md) <not a link>").is_empty());
    }

    #[test]
    fn test_scan_empty_text() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_scan_multiple_links_same_line() {
        let links = scan("[a](http://a.com) [b](https://b.org) <ftp://c.net>");
        assert_eq!(links.len(), 3);
        assert_eq!(links["[b](https://b.org)"], "https://b.org");
    }

    #[test]
    fn test_scan_is_non_greedy() {
        let links = scan("[a](http://a.com)) tail)");
        assert_eq!(links["[a](http://a.com)"], "http://a.com");
    }

    #[test]
    fn test_scan_duplicate_text_collapses() {
        let links = scan("[x](http://x.io) and again [x](http://x.io)");
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_scan_does_not_cross_lines() {
        assert!(scan("[a](http://\nexample.com)").is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // scan_matches
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_scan_matches_offsets() {
        let matches = scan_matches("Check [this](http://example.com) out");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 6);
        assert_eq!(matches[0].end, 32);
        assert_eq!(matches[0].url, "http://example.com");
    }

    #[test]
    fn test_scan_matches_keeps_duplicates_in_order() {
        let matches = scan_matches("<http://x.io> <http://x.io> [y](http://y.io)");
        assert_eq!(matches.len(), 3);
        // bracketed pass first
        assert_eq!(matches[0].matched_text, "[y](http://y.io)");
        assert_eq!(matches[1].start, 0);
        assert_eq!(matches[2].start, 14);
    }

    #[test]
    fn test_scan_matches_character_offsets() {
        let matches = scan_matches("På <http://ø.no>");
        assert_eq!(matches[0].start, 3);
        assert_eq!(matches[0].end, 16);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // resolve_at_position
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_resolve_inside_bracketed_label() {
        assert_eq!(
            resolved("Check [this](http://example.com) out", 8),
            Some("http://example.com/".to_string())
        );
    }

    #[test]
    fn test_resolve_inside_angle_link() {
        assert_eq!(
            resolved("See <http://example.com> now", 20),
            Some("http://example.com/".to_string())
        );
    }

    #[test]
    fn test_resolve_no_links() {
        assert_eq!(resolved("no links here", 3), None);
    }

    #[test]
    fn test_resolve_empty_text() {
        assert_eq!(resolved("", 0), None);
    }

    #[test]
    fn test_resolve_bounds_are_inclusive() {
        let text = "Check [this](http://example.com) out";
        // span is [6, 32]
        for position in 6..=32 {
            assert!(
                resolved(text, position).is_some(),
                "position {} should resolve",
                position
            );
        }
        assert_eq!(resolved(text, 5), None);
        assert_eq!(resolved(text, 33), None);
        assert_eq!(resolved(text, 1000), None);
    }

    #[test]
    fn test_resolve_picks_the_right_link() {
        let text = "[a](http://a.com) - [b](http://b.com)";
        assert_eq!(resolved(text, 2), Some("http://a.com/".to_string()));
        assert_eq!(resolved(text, 25), Some("http://b.com/".to_string()));
        assert_eq!(resolved(text, 18), None);
    }

    #[test]
    fn test_resolve_duplicate_only_first_occurrence() {
        let text = "[x](http://x.io) and again [x](http://x.io)";
        assert!(resolved(text, 3).is_some());
        // the second copy is never located
        assert_eq!(resolved(text, 30), None);
    }

    #[test]
    fn test_resolve_touching_spans_last_key_wins() {
        // "<http://b.io>" sorts before "[a](http://a.io)"; position 16 is the
        // end of the first span and the start of the second.
        let text = "[a](http://a.io)<http://b.io>";
        assert_eq!(resolved(text, 16), Some("http://a.io/".to_string()));
    }

    #[test]
    fn test_resolve_custom_scheme() {
        let url = resolve_at_position("open <note://inbox> now", 8).unwrap();
        assert_eq!(url.scheme(), "note");
    }

    #[test]
    fn test_resolve_relative_file_link() {
        let url = resolve_at_position("[doc](file://sub/doc.md)", 3).unwrap();
        assert_eq!(url.scheme(), "file");
    }

    #[test]
    fn test_resolve_unparseable_target() {
        // '://' present but the scheme is not a valid URL scheme
        assert_eq!(resolved("<1 2://broken>", 3), None);
    }

    #[test]
    fn test_resolve_with_multibyte_prefix() {
        let text = "Sjå [her](https://ø.no) då";
        assert!(resolved(text, 5).is_some());
        assert_eq!(resolved(text, 2), None);
    }
}
