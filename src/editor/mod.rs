//! Editor module for mdtextedit
//!
//! The text buffer, the input event pipeline, link opening and the egui
//! widget that ties them to a `TextEdit`.

mod buffer;
mod controller;
mod highlight;
mod opener;
mod widget;

pub use controller::InteractionController;
pub use highlight::LinkHighlighter;
pub use opener::SystemUrlOpener;
pub use widget::MarkdownTextEdit;
