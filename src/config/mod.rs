//! Configuration module for mdtextedit
//!
//! User preferences (font, notes directory, ignored link schemes) and their
//! JSON persistence in the platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
