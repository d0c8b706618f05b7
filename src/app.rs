//! Main application for mdtextedit
//!
//! Hosts a single markdown document in a `MarkdownTextEdit`, with a small
//! toolbar for view settings and a status bar that reports activated links.

use crate::config::{save_config_silent, EditorFont, Settings};
use crate::editor::{InteractionController, LinkHighlighter, MarkdownTextEdit, SystemUrlOpener};
use eframe::egui;
use log::{debug, info};

/// Text shown when the editor starts.
const WELCOME_TEXT: &str = "\
# Welcome

Ctrl+click (Cmd+click on macOS) a link to open it, or put the cursor on one
and press Ctrl+Enter:

- [Rust](https://www.rust-lang.org)
- <https://docs.rs>
- [a note next to this one](file://todo.md)

Select some lines and press Tab to indent them, Shift+Tab to outdent.
";

/// The main application state.
pub struct MdTextEditApp {
    settings: Settings,
    content: String,
    modified: bool,
    controller: InteractionController,
    highlighter: LinkHighlighter,
    last_link: Option<String>,
}

impl MdTextEditApp {
    /// Create the application from loaded settings.
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        info!("Initializing editor");
        let controller = build_controller(&settings);
        Self {
            settings,
            content: WELCOME_TEXT.to_string(),
            modified: false,
            controller,
            highlighter: LinkHighlighter::new(),
            last_link: None,
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.settings.word_wrap, "Word wrap");
            ui.separator();
            for font in [EditorFont::Monospace, EditorFont::Proportional] {
                ui.selectable_value(&mut self.settings.font_family, font, font.display_name());
            }
            ui.separator();
            ui.add(
                egui::Slider::new(
                    &mut self.settings.font_size,
                    Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
                )
                .text("Size"),
            );
        });
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.modified {
                ui.label("● modified");
                ui.separator();
            }
            match &self.last_link {
                Some(url) => ui.label(format!("Last link: {}", url)),
                None => ui.label("Ctrl+click a link to open it"),
            };
        });
    }

    fn remember_window_size(&mut self, ctx: &egui::Context) {
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window_size.width = rect.width();
            self.settings.window_size.height = rect.height();
        }
    }
}

/// Build the input pipeline from the link settings.
fn build_controller(settings: &Settings) -> InteractionController {
    InteractionController::new(
        Box::new(SystemUrlOpener::new(settings.notes_prefix())),
        settings.ignored_url_schemes.clone(),
    )
}

impl eframe::App for MdTextEditApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.remember_window_size(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.show_toolbar(ui));
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.show_status_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let output = MarkdownTextEdit::new(
                &mut self.content,
                &mut self.controller,
                &mut self.highlighter,
            )
            .id(egui::Id::new("main_editor"))
            .font_size(self.settings.font_size)
            .font_family(self.settings.font_family)
            .word_wrap(self.settings.word_wrap)
            .show(ui);

            if output.changed {
                self.modified = true;
            }
            for url in output.activated_links {
                debug!("Status bar link: {}", url);
                self.last_link = Some(url.to_string());
            }
        });
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.settings.sanitize();
        save_config_silent(&self.settings);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
