//! Markdown text algorithms
//!
//! Pure functions over plain text, independent of any widget:
//! - link detection and resolution of the link under a cursor position
//! - block indentation/outdentation of selected text
//!
//! # Example
//! ```ignore
//! use crate::markdown::indent::transform;
//! use crate::markdown::resolve_at_position;
//!
//! let url = resolve_at_position("Check [this](http://example.com) out", 8);
//! assert_eq!(url.unwrap().as_str(), "http://example.com/");
//!
//! let indented = transform("one\u{201a}two", false);
//! assert_eq!(indented.as_deref(), Some("\tone\n\ttwo"));
//! ```

pub mod indent;
pub mod links;

pub use indent::indent_range;
pub use links::{resolve_at_position, scan_matches};
