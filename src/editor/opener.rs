//! Handing activated links to the outside world
//!
//! The editor never opens anything itself; it calls a [`UrlOpener`]. The
//! system implementation first makes relative `file://` links absolute
//! against the notes directory, then asks the platform to open the result.

use crate::error::{Error, Result};
use log::{debug, info};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use url::Url;

/// Opens URLs on behalf of the editor.
pub trait UrlOpener {
    fn open(&self, url: &Url) -> Result<()>;
}

static RELATIVE_FILE_URL: OnceLock<Regex> = OnceLock::new();

fn relative_file_url() -> &'static Regex {
    RELATIVE_FILE_URL.get_or_init(|| {
        Regex::new(r"^file://([^/].+)$").expect("relative file url pattern is valid")
    })
}

/// Rewrite `file://relative/path` to `file://<notes_prefix>/relative/path`.
///
/// Works on the serialized URL as a plain string substitution. Absolute
/// file URLs (`file:///...`) and every other scheme pass through unchanged.
pub fn absolutize_file_url(url: &str, notes_prefix: &str) -> String {
    relative_file_url()
        .replace(url, |caps: &Captures| {
            format!("file://{}/{}", notes_prefix, &caps[1])
        })
        .into_owned()
}

/// Serialize a URL for hand-off.
///
/// `Url` gives a host-only file URL an empty path of `/`, so
/// `file://todo.md` would come back as `file://todo.md/`. Drop that slash so
/// the relative-link rewrite sees the name the user typed.
pub fn serialize_for_open(url: &Url) -> String {
    let serialized = url.as_str();
    if url.scheme() == "file"
        && url.host_str().is_some()
        && url.path() == "/"
        && url.query().is_none()
        && url.fragment().is_none()
    {
        serialized.trim_end_matches('/').to_string()
    } else {
        serialized.to_string()
    }
}

/// Opens URLs with the platform's default handler via the `open` crate.
#[derive(Debug, Clone, Default)]
pub struct SystemUrlOpener {
    notes_prefix: String,
}

impl SystemUrlOpener {
    /// `notes_prefix` is the notes directory without a trailing slash.
    pub fn new(notes_prefix: impl Into<String>) -> Self {
        Self {
            notes_prefix: notes_prefix.into(),
        }
    }
}

impl UrlOpener for SystemUrlOpener {
    fn open(&self, url: &Url) -> Result<()> {
        let target = absolutize_file_url(&serialize_for_open(url), &self.notes_prefix);
        if target != url.as_str() {
            debug!("Rewrote '{}' to '{}'", url, target);
        }
        info!("Opening {}", target);
        open::that(&target).map_err(|source| Error::UrlOpen {
            url: target,
            source,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
