//! Allow-list of known junk that leaked into rich-text fields from the old
//! front end: button CSS pasted into the editor and orphaned button labels.
//!
//! HTML input is cleaned on the parsed tree ([`strip_leaked_css`] per text
//! node, [`is_noise_label`] per paragraph); [`strip_noise`] covers plain and
//! converted text.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// .modern-btn { ... }, .visit-btn:hover { ... }, .visit-button-lg { ... }
static LEAKED_CSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\.(?:modern-btn|visit-btn|visit-button)[\w-]*(?::{1,2}[\w-]+)?\s*\{[^{}]*\}").unwrap()
});

static NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // <p>Visit Button</p> in HTML output
        r"(?i)<p\b[^>]*>\s*Visit Button\s*</p\s*>",
        // a bare "Visit Button" label on its own line
        r"(?im)^[ \t]*Visit Button[ \t]*$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

const LABEL: &str = "Visit Button";

/// Remove leaked button CSS from a run of text.
#[must_use]
pub(crate) fn strip_leaked_css(text: &str) -> Cow<'_, str> {
    LEAKED_CSS.replace_all(text, "")
}

/// Whether a paragraph's whole text is an orphaned button label.
#[must_use]
pub(crate) fn is_noise_label(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(LABEL)
}

/// Remove every known noise fragment from `input`.
#[must_use]
pub fn strip_noise(input: &str) -> String {
    let mut text = strip_leaked_css(input).into_owned();
    for pattern in NOISE_PATTERNS.iter() {
        if pattern.is_match(&text) {
            text = pattern.replace_all(&text, "").into_owned();
        }
    }
    text
}
