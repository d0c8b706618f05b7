//! Link highlighting for the editor layouter
//!
//! Each editor owns one [`LinkHighlighter`]. It turns the buffer text into an
//! egui `LayoutJob` where link spans are underlined and colored, and caches
//! the job so unchanged text is not rescanned every frame.

use crate::markdown::scan_matches;
use crate::string_utils::char_to_byte;
use eframe::egui::text::{LayoutJob, TextFormat};
use eframe::egui::{self, Color32, FontId, Stroke};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// Colors used when laying out editor text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightColors {
    pub text: Color32,
    pub link: Color32,
}

impl HighlightColors {
    /// Derive colors from the active egui visuals.
    pub fn from_visuals(visuals: &egui::Visuals) -> Self {
        Self {
            text: visuals.text_color(),
            link: visuals.hyperlink_color,
        }
    }
}

/// Byte ranges of every link in `text`, sorted and non-overlapping.
///
/// An autolink nested in a bracketed link's label is folded into the outer
/// span.
pub fn link_ranges(text: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = scan_matches(text)
        .into_iter()
        .map(|m| char_to_byte(text, m.start)..char_to_byte(text, m.end))
        .collect();
    spans.sort_by_key(|r| (r.start, std::cmp::Reverse(r.end)));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start < last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Per-editor layout cache with link styling.
#[derive(Debug, Default)]
pub struct LinkHighlighter {
    cache: Option<(u64, LayoutJob)>,
}

impl LinkHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build (or reuse) the layout job for `text`.
    pub fn layout_job(
        &mut self,
        text: &str,
        font_id: &FontId,
        colors: HighlightColors,
        wrap_width: f32,
    ) -> LayoutJob {
        let key = cache_key(text, font_id, colors);
        let mut job = match &self.cache {
            Some((cached_key, job)) if *cached_key == key => job.clone(),
            _ => {
                let job = build_job(text, font_id, colors);
                self.cache = Some((key, job.clone()));
                job
            }
        };
        job.wrap.max_width = wrap_width;
        job
    }
}

fn cache_key(text: &str, font_id: &FontId, colors: HighlightColors) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    font_id.size.to_bits().hash(&mut hasher);
    font_id.family.hash(&mut hasher);
    colors.text.hash(&mut hasher);
    colors.link.hash(&mut hasher);
    hasher.finish()
}

fn build_job(text: &str, font_id: &FontId, colors: HighlightColors) -> LayoutJob {
    let plain = TextFormat {
        font_id: font_id.clone(),
        color: colors.text,
        ..Default::default()
    };
    let link = TextFormat {
        font_id: font_id.clone(),
        color: colors.link,
        underline: Stroke::new(1.0, colors.link),
        ..Default::default()
    };

    let mut job = LayoutJob::default();
    let mut offset = 0;
    for range in link_ranges(text) {
        if range.start > offset {
            job.append(&text[offset..range.start], 0.0, plain.clone());
        }
        job.append(&text[range.clone()], 0.0, link.clone());
        offset = range.end;
    }
    if offset < text.len() || text.is_empty() {
        job.append(&text[offset..], 0.0, plain);
    }
    job
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
