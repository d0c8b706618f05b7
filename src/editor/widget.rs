//! Markdown text editor widget for egui
//!
//! Wraps egui's multiline `TextEdit` and routes Tab, Shift+Tab, Ctrl+Enter,
//! Ctrl+click and the Ctrl key itself through an [`InteractionController`]
//! before (or after) the `TextEdit` gets to see them.

use crate::config::EditorFont;
use crate::editor::buffer::TextBuffer;
use crate::editor::controller::{
    CursorHint, EditorKey, EventResult, InputEvent, InteractionController, Modifiers, MouseButton,
    Notification,
};
use crate::editor::highlight::{HighlightColors, LinkHighlighter};
use eframe::egui::{self, FontId, Key, PointerButton, ScrollArea, TextEdit, Ui};
use eframe::egui::text::{CCursor, CCursorRange};
use eframe::egui::text_edit::TextEditState;
use log::debug;
use url::Url;

/// Result of showing the editor widget.
pub struct EditorOutput {
    /// Whether the content was modified.
    pub changed: bool,
    /// Links activated this frame, in order.
    pub activated_links: Vec<Url>,
}

/// A plain-text markdown editor with link activation and block indentation.
///
/// # Example
///
/// ```ignore
/// MarkdownTextEdit::new(&mut content, &mut controller, &mut highlighter)
///     .font_size(settings.font_size)
///     .word_wrap(settings.word_wrap)
///     .show(ui);
/// ```
pub struct MarkdownTextEdit<'a> {
    content: &'a mut String,
    controller: &'a mut InteractionController,
    highlighter: &'a mut LinkHighlighter,
    font_size: f32,
    font_family: EditorFont,
    word_wrap: bool,
    id: Option<egui::Id>,
}

impl<'a> MarkdownTextEdit<'a> {
    pub fn new(
        content: &'a mut String,
        controller: &'a mut InteractionController,
        highlighter: &'a mut LinkHighlighter,
    ) -> Self {
        Self {
            content,
            controller,
            highlighter,
            font_size: 14.0,
            font_family: EditorFont::default(),
            word_wrap: true,
            id: None,
        }
    }

    /// Set the font size for the editor.
    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font family for the editor.
    #[must_use]
    pub fn font_family(mut self, font_family: EditorFont) -> Self {
        self.font_family = font_family;
        self
    }

    /// Set whether word wrap is enabled.
    #[must_use]
    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    /// Set a custom ID for the editor.
    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Show the editor widget and return the output.
    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let Self {
            content,
            controller,
            highlighter,
            font_size,
            font_family,
            word_wrap,
            id,
        } = self;

        let id = id.unwrap_or_else(|| ui.id().with("markdown_text_edit"));
        let original_content = content.clone();
        let has_focus = ui.memory(|m| m.has_focus(id));

        // Keys are handled before the TextEdit so a consumed Tab never
        // reaches it.
        let (anchor, cursor) = load_selection(ui.ctx(), id);
        let mut buffer = TextBuffer::with_selection(std::mem::take(content), anchor, cursor);

        let command_held = ui.input(|i| i.modifiers.command);
        sync_command_key(controller, command_held, &mut buffer);

        if has_focus {
            let mut consumed_any = false;
            for (event, egui_modifiers, key) in pending_key_events(ui) {
                if controller.handle(&event, &mut buffer) == EventResult::Consumed {
                    ui.input_mut(|i| i.consume_key(egui_modifiers, key));
                    consumed_any = true;
                }
            }
            if consumed_any {
                store_selection(ui.ctx(), id, buffer.anchor(), buffer.cursor());
            }
        }
        *content = buffer.into_text();

        let font_id = FontId::new(font_size, font_family.family());
        let colors = HighlightColors::from_visuals(ui.visuals());
        let layout_font = font_id.clone();
        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| {
            let wrap_width = if word_wrap { wrap_width } else { f32::INFINITY };
            let job = highlighter.layout_job(text, &layout_font, colors, wrap_width);
            ui.fonts(|f| f.layout_job(job))
        };

        let text_output = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                TextEdit::multiline(&mut *content)
                    .id(id)
                    .frame(false)
                    .lock_focus(true)
                    .font(font_id.clone())
                    .desired_width(f32::INFINITY)
                    .layouter(&mut layouter)
                    .show(ui)
            })
            .inner;

        let response = &text_output.response;

        // Mouse release: the TextEdit has already moved the cursor to the
        // click position.
        let released = ui.input(|i| {
            [
                PointerButton::Primary,
                PointerButton::Secondary,
                PointerButton::Middle,
            ]
            .into_iter()
            .find(|b| i.pointer.button_released(*b))
            .map(|b| (b, map_modifiers(i.modifiers)))
        });
        if let (Some((button, modifiers)), Some(range)) = (released, text_output.cursor_range) {
            if let Some(button) = map_button(button) {
                if response.hovered() {
                    let mut buffer = TextBuffer::with_selection(
                        std::mem::take(content),
                        range.secondary.ccursor.index,
                        range.primary.ccursor.index,
                    );
                    controller.handle(&InputEvent::MouseRelease { button, modifiers }, &mut buffer);
                    *content = buffer.into_text();
                }
            }
        }

        if controller.cursor_hint() == CursorHint::PointingHand && response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let changed = *content != original_content;
        if changed {
            debug!("Editor content changed");
        }

        let activated_links = controller
            .take_notifications()
            .into_iter()
            .map(|n| match n {
                Notification::LinkActivated(url) => url,
            })
            .collect();

        EditorOutput {
            changed,
            activated_links,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Input translation
// ─────────────────────────────────────────────────────────────────────────────

fn map_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.shift,
        command: modifiers.command,
    }
}

fn map_button(button: PointerButton) -> Option<MouseButton> {
    match button {
        PointerButton::Primary => Some(MouseButton::Primary),
        PointerButton::Secondary => Some(MouseButton::Secondary),
        PointerButton::Middle => Some(MouseButton::Middle),
        PointerButton::Extra1 | PointerButton::Extra2 => None,
    }
}

/// Translate this frame's key presses into pipeline events, paired with the
/// egui modifiers and key needed to consume them.
fn pending_key_events(ui: &Ui) -> Vec<(InputEvent, egui::Modifiers, Key)> {
    ui.input(|i| {
        let mut events = Vec::new();
        let modifiers = map_modifiers(i.modifiers);

        if i.key_pressed(Key::Tab) {
            let consume_with = if i.modifiers.shift {
                egui::Modifiers::SHIFT
            } else {
                egui::Modifiers::NONE
            };
            events.push((
                InputEvent::KeyPress {
                    key: EditorKey::Tab,
                    modifiers,
                },
                consume_with,
                Key::Tab,
            ));
        }

        if i.key_pressed(Key::Enter) && i.modifiers.command {
            events.push((
                InputEvent::KeyPress {
                    key: EditorKey::Enter,
                    modifiers,
                },
                egui::Modifiers::COMMAND,
                Key::Enter,
            ));
        }

        events
    })
}

/// egui reports modifiers as state, not key events. Synthesize a press or
/// release of the command key whenever that state disagrees with the
/// controller's cursor hint.
fn sync_command_key(controller: &mut InteractionController, held: bool, buffer: &mut TextBuffer) {
    let event = match (held, controller.cursor_hint()) {
        (true, CursorHint::Text) => InputEvent::KeyPress {
            key: EditorKey::Command,
            modifiers: Modifiers::COMMAND,
        },
        (false, CursorHint::PointingHand) => InputEvent::KeyRelease {
            key: EditorKey::Command,
            modifiers: Modifiers::NONE,
        },
        _ => return,
    };
    controller.handle(&event, buffer);
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection state
// ─────────────────────────────────────────────────────────────────────────────

/// Current `(anchor, cursor)` of the TextEdit, in characters.
fn load_selection(ctx: &egui::Context, id: egui::Id) -> (usize, usize) {
    TextEditState::load(ctx, id)
        .and_then(|state| state.cursor.char_range())
        .map(|range| (range.secondary.index, range.primary.index))
        .unwrap_or((0, 0))
}

fn store_selection(ctx: &egui::Context, id: egui::Id, anchor: usize, cursor: usize) {
    let mut state = TextEditState::load(ctx, id).unwrap_or_default();
    state.cursor.set_char_range(Some(CCursorRange {
        primary: CCursor::new(cursor),
        secondary: CCursor::new(anchor),
    }));
    state.store(ctx, id);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
