//! User settings and preferences for mdtextedit
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use eframe::egui;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Font Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Font families available to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditorFont {
    /// egui's built-in proportional font
    Proportional,
    /// egui's built-in monospace font (default, keeps tab stops aligned)
    #[default]
    Monospace,
}

impl EditorFont {
    /// Get the display name for the font.
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorFont::Proportional => "Proportional",
            EditorFont::Monospace => "Monospace",
        }
    }

    /// The egui font family backing this choice.
    pub fn family(&self) -> egui::FontFamily {
        match self {
            EditorFont::Proportional => egui::FontFamily::Proportional,
            EditorFont::Monospace => egui::FontFamily::Monospace,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 700.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// Serialized to JSON in the user's config directory. Every field has a
/// default, so partial or older files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Font family for the editor
    pub font_family: EditorFont,

    /// Font size for the editor (in points)
    pub font_size: f32,

    /// Whether to enable word wrap
    pub word_wrap: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Links
    // ─────────────────────────────────────────────────────────────────────────
    /// Base directory that relative `file://` links are resolved against
    pub notes_path: Option<PathBuf>,

    /// URL schemes that are reported on click but never opened
    pub ignored_url_schemes: Vec<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size
    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_family: EditorFont::default(),
            font_size: 14.0,
            word_wrap: true,
            notes_path: None,
            ignored_url_schemes: Vec::new(),
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Scheme names are compared against `Url::scheme()`, which is always
    /// lowercase, so they are normalized here along with the numeric fields.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        for scheme in &mut self.ignored_url_schemes {
            *scheme = scheme.trim().trim_end_matches(':').to_ascii_lowercase();
        }
        let mut seen = HashSet::new();
        self.ignored_url_schemes
            .retain(|s| !s.is_empty() && seen.insert(s.clone()));

        if self
            .notes_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.notes_path = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// The notes directory as the string prefix used when rewriting
    /// relative file links. An unset path rewrites against the root.
    pub fn notes_prefix(&self) -> String {
        self.notes_path
            .as_ref()
            .map(|p| p.to_string_lossy().trim_end_matches('/').to_string())
            .unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.font_family, EditorFont::Monospace);
        assert_eq!(settings.font_size, 14.0);
        assert!(settings.word_wrap);
        assert!(settings.notes_path.is_none());
        assert!(settings.ignored_url_schemes.is_empty());
        assert_eq!(settings.window_size.width, 900.0);
    }

    #[test]
    fn test_font_serialization() {
        assert_eq!(
            serde_json::to_string(&EditorFont::Monospace).unwrap(),
            "\"monospace\""
        );
        assert_eq!(
            serde_json::from_str::<EditorFont>("\"proportional\"").unwrap(),
            EditorFont::Proportional
        );
    }

    #[test]
    fn test_font_family_mapping() {
        assert_eq!(EditorFont::Monospace.family(), egui::FontFamily::Monospace);
        assert_eq!(
            EditorFont::Proportional.family(),
            egui::FontFamily::Proportional
        );
        assert_eq!(EditorFont::Monospace.display_name(), "Monospace");
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings {
            notes_path: Some(PathBuf::from("/home/me/notes")),
            ignored_url_schemes: vec!["note".to_string()],
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_font_size() {
        let mut settings = Settings::default();
        settings.font_size = 4.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);

        settings.font_size = 100.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
    }

    #[test]
    fn test_sanitize_ignored_schemes() {
        let mut settings = Settings::default();
        settings.ignored_url_schemes = vec![
            "Note:".to_string(),
            "note".to_string(),
            "  ".to_string(),
            "task".to_string(),
        ];
        settings.sanitize();
        assert_eq!(settings.ignored_url_schemes, vec!["note", "task"]);
    }

    #[test]
    fn test_sanitize_drops_non_adjacent_duplicate_schemes() {
        let mut settings = Settings::default();
        settings.ignored_url_schemes =
            vec!["note".to_string(), "task".to_string(), "Note".to_string()];
        settings.sanitize();
        assert_eq!(settings.ignored_url_schemes, vec!["note", "task"]);
    }

    #[test]
    fn test_sanitize_empty_notes_path() {
        let mut settings = Settings::default();
        settings.notes_path = Some(PathBuf::new());
        settings.sanitize();
        assert!(settings.notes_path.is_none());
    }

    #[test]
    fn test_notes_prefix() {
        let mut settings = Settings::default();
        assert_eq!(settings.notes_prefix(), "");

        settings.notes_path = Some(PathBuf::from("/home/me/notes/"));
        assert_eq!(settings.notes_prefix(), "/home/me/notes");
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"font_size": 4.0, "ignored_url_schemes": ["NOTE"]}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.ignored_url_schemes, vec!["note"]);
    }
}
