//! Input event pipeline for the markdown editor
//!
//! Key and mouse events run through an ordered list of handlers. Each
//! handler either consumes the event, which stops propagation and keeps the
//! host widget from acting on it, or ignores it so the next handler (and
//! finally the widget's default behavior) gets a turn.
//!
//! The default pipeline is:
//! 1. [`IndentationHandler`]: Tab / Shift+Tab
//! 2. [`LinkHandler`]: Ctrl+click and Ctrl+Enter on a link
//! 3. [`CursorHintHandler`]: pointing-hand cursor while Ctrl is held

use crate::editor::buffer::TextBuffer;
use crate::editor::opener::UrlOpener;
use crate::markdown::resolve_at_position;
use log::{debug, info, warn};
use url::Url;

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Keys the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Tab,
    Enter,
    /// The command modifier itself (Ctrl, or Cmd on macOS)
    Command,
}

/// Modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Cmd on macOS
    pub command: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        command: false,
    };
    #[cfg(test)]
    pub const SHIFT: Self = Self {
        shift: true,
        command: false,
    };
    pub const COMMAND: Self = Self {
        shift: false,
        command: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

/// An input event delivered to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPress {
        key: EditorKey,
        modifiers: Modifiers,
    },
    KeyRelease {
        key: EditorKey,
        modifiers: Modifiers,
    },
    /// A mouse button was released; the buffer cursor is already at the
    /// clicked position.
    MouseRelease {
        button: MouseButton,
        modifiers: Modifiers,
    },
}

/// Whether a handler took ownership of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

/// Mouse cursor shape the host should show over the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Text,
    PointingHand,
}

/// Things that happened while handling events, for the host to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A link was activated (whether or not it was opened)
    LinkActivated(Url),
}

/// Mutable state a handler may touch.
pub struct EventContext<'a> {
    pub buffer: &'a mut TextBuffer,
    pub cursor_hint: &'a mut CursorHint,
    pub notifications: &'a mut Vec<Notification>,
}

/// One stage of the pipeline.
pub trait InputHandler {
    fn handle(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventResult;
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Tab indents the selection, Shift+Tab outdents it.
///
/// Tab without a selection is left to the host, which inserts a literal tab.
/// Shift+Tab is always consumed so focus never leaves the editor, even when
/// there is no tab to remove.
#[derive(Debug, Default)]
pub struct IndentationHandler;

impl InputHandler for IndentationHandler {
    fn handle(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventResult {
        let InputEvent::KeyPress {
            key: EditorKey::Tab,
            modifiers,
        } = event
        else {
            return EventResult::Ignored;
        };
        if modifiers.command {
            return EventResult::Ignored;
        }

        let reverse = modifiers.shift;
        let changed = ctx.buffer.indent_selection(reverse);
        debug!(
            "{} handled, buffer changed: {}",
            if reverse { "Shift+Tab" } else { "Tab" },
            changed
        );

        if changed || reverse {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }
}

/// Activates the link under the cursor on Ctrl+click or Ctrl+Enter.
pub struct LinkHandler {
    opener: Box<dyn UrlOpener>,
    ignored_schemes: Vec<String>,
}

impl LinkHandler {
    pub fn new(opener: Box<dyn UrlOpener>, ignored_schemes: Vec<String>) -> Self {
        Self {
            opener,
            ignored_schemes,
        }
    }

    /// Resolve the link under the cursor, notify, and open it unless its
    /// scheme is ignored. Returns whether a link was activated.
    fn activate_link_at_cursor(&self, ctx: &mut EventContext<'_>) -> bool {
        let block = ctx.buffer.block_at_cursor();
        let position = ctx.buffer.cursor_in_block();
        let Some(url) = resolve_at_position(block.text, position) else {
            return false;
        };

        info!("Link activated: {}", url);
        ctx.notifications
            .push(Notification::LinkActivated(url.clone()));

        if self.ignored_schemes.iter().any(|s| s == url.scheme()) {
            debug!("Not opening '{}': scheme is ignored", url);
        } else if let Err(e) = self.opener.open(&url) {
            warn!("{}", e);
        }
        true
    }
}

impl InputHandler for LinkHandler {
    fn handle(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventResult {
        match event {
            InputEvent::MouseRelease {
                button: MouseButton::Primary,
                modifiers,
            } if modifiers.command => {
                // the click itself still places the cursor
                self.activate_link_at_cursor(ctx);
                EventResult::Ignored
            }
            InputEvent::KeyPress {
                key: EditorKey::Enter,
                modifiers,
            } if modifiers.command => {
                if self.activate_link_at_cursor(ctx) {
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            _ => EventResult::Ignored,
        }
    }
}

/// Shows a pointing hand while the command modifier is held.
#[derive(Debug, Default)]
pub struct CursorHintHandler;

impl InputHandler for CursorHintHandler {
    fn handle(&mut self, event: &InputEvent, ctx: &mut EventContext<'_>) -> EventResult {
        match event {
            InputEvent::KeyPress {
                key: EditorKey::Command,
                ..
            } => *ctx.cursor_hint = CursorHint::PointingHand,
            InputEvent::KeyRelease {
                key: EditorKey::Command,
                ..
            } => *ctx.cursor_hint = CursorHint::Text,
            _ => {}
        }
        EventResult::Ignored
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

/// Runs events through the handler pipeline and keeps the state handlers
/// share between events.
pub struct InteractionController {
    handlers: Vec<Box<dyn InputHandler>>,
    cursor_hint: CursorHint,
    notifications: Vec<Notification>,
}

impl InteractionController {
    /// The default pipeline: indentation, links, cursor hint.
    pub fn new(opener: Box<dyn UrlOpener>, ignored_schemes: Vec<String>) -> Self {
        Self::with_handlers(vec![
            Box::new(IndentationHandler),
            Box::new(LinkHandler::new(opener, ignored_schemes)),
            Box::new(CursorHintHandler),
        ])
    }

    /// A pipeline with custom handlers, run in the given order.
    pub fn with_handlers(handlers: Vec<Box<dyn InputHandler>>) -> Self {
        Self {
            handlers,
            cursor_hint: CursorHint::default(),
            notifications: Vec::new(),
        }
    }

    /// Deliver one event. Stops at the first handler that consumes it.
    pub fn handle(&mut self, event: &InputEvent, buffer: &mut TextBuffer) -> EventResult {
        let mut ctx = EventContext {
            buffer,
            cursor_hint: &mut self.cursor_hint,
            notifications: &mut self.notifications,
        };
        for handler in &mut self.handlers {
            if handler.handle(event, &mut ctx) == EventResult::Consumed {
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }

    pub fn cursor_hint(&self) -> CursorHint {
        self.cursor_hint
    }

    /// Take all notifications produced since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
