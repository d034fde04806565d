//! # ferry-sanitize
//!
//! Cleanup of rich-text fields on their way from Strapi to WordPress.
//!
//! ```text
//! input ──► HTML? ──yes──► clean_html ──► recover_tables ──► (Markdown) html_to_markdown ─┐
//!             │                                                                            │
//!             └──no───────────────────────────────────────────────────────────────────────┤
//!                                                                                          ▼
//!                                          strip_noise ──► UrlPolicy::apply ──► normalize_whitespace
//! ```
//!
//! HTML is parsed with `scraper` and written back out by the crate itself.
//! Noise is removed on the parsed tree before empty paragraphs are judged,
//! every stage is idempotent and the Markdown converter never emits markup
//! that [`looks_like_html`] reacts to, so `sanitize(sanitize(x)) == sanitize(x)`.

mod cleanup;
mod entities;
mod markdown;
mod noise;
mod table;
mod tree;
mod urls;
mod whitespace;

pub use cleanup::clean_html;
pub use markdown::{html_to_markdown, is_video_embed};
pub use noise::strip_noise;
pub use table::{KNOWN_HEADERS, recover_tables, render_table};
pub use urls::{UrlPolicy, is_asset_path};
pub use whitespace::normalize_whitespace;

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Block-level and executable tags. Inline tags alone (`<a>`, `<strong>`)
/// inside Markdown do not switch a field to the HTML path.
static HTML_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<(?:p|div|section|article|header|footer|main|aside|h[1-6]|ul|ol|li|blockquote|figure|figcaption|br|pre|hr|script|style)\b[^>]*>",
    )
    .unwrap()
});

/// Output format of the sanitizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    #[default]
    Markdown,
    Html,
}

impl TextFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown text format: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    pub target: TextFormat,
    pub urls: UrlPolicy,
}

impl SanitizeOptions {
    #[must_use]
    pub fn markdown(urls: UrlPolicy) -> Self {
        Self {
            target: TextFormat::Markdown,
            urls,
        }
    }

    #[must_use]
    pub fn html(urls: UrlPolicy) -> Self {
        Self {
            target: TextFormat::Html,
            urls,
        }
    }
}

/// Whether `input` carries block-level HTML markup.
#[must_use]
pub fn looks_like_html(input: &str) -> bool {
    HTML_MARKUP.is_match(input)
}

/// Sanitize a rich-text field.
#[must_use]
pub fn sanitize(input: &str, options: &SanitizeOptions) -> String {
    let structured = if looks_like_html(input) {
        let cleaned = recover_tables(&clean_html(input));
        match options.target {
            TextFormat::Markdown => html_to_markdown(&cleaned),
            TextFormat::Html => cleaned,
        }
    } else {
        input.to_string()
    };

    let denoised = strip_noise(&structured);
    let rewritten = options.urls.apply(&denoised);
    normalize_whitespace(&rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn markdown_passes_through_with_whitespace_fixes() {
        let input = "\n\n# Title  \n\n\n\nBody with <strong>inline</strong> html.";
        assert_eq!(
            sanitize(input, &SanitizeOptions::default()),
            "# Title\n\nBody with <strong>inline</strong> html.\n"
        );
    }

    #[test]
    fn html_is_converted_for_markdown_targets() {
        let input = "<p class=\"lead\">Hello <b>there</b></p><p>&nbsp;</p><script>x()</script>";
        assert_eq!(sanitize(input, &SanitizeOptions::default()), "Hello **there**\n");
    }

    #[test]
    fn html_target_keeps_markup() {
        let input = "<p style=\"x\">Hello</p>\n\n\n<p></p>";
        assert_eq!(
            sanitize(input, &SanitizeOptions::html(UrlPolicy::passthrough())),
            "<p>Hello</p>\n"
        );
    }

    #[test]
    fn paragraphs_holding_only_noise_vanish_in_one_pass() {
        let input = "<p>.modern-btn { color: red; }</p>\n<p>Hi</p>";
        let options = SanitizeOptions::html(UrlPolicy::passthrough());
        let once = sanitize(input, &options);
        assert_eq!(once, "<p>Hi</p>\n");
        assert_eq!(sanitize(&once, &options), once);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize("", &SanitizeOptions::default()), "");
        assert_eq!(sanitize("<p></p>", &SanitizeOptions::default()), "");
    }

    #[test]
    fn detection_ignores_inline_only_markup() {
        assert!(!looks_like_html("A [link](x) and <em>emphasis</em>"));
        assert!(!looks_like_html("<table>\n<tbody>\n</tbody>\n</table>"));
        assert!(looks_like_html("<P>para</P>"));
        assert!(looks_like_html("line<br/>break"));
    }

    #[test]
    fn text_format_parses() {
        assert_eq!("MD".parse::<TextFormat>().unwrap(), TextFormat::Markdown);
        assert_eq!("html".parse::<TextFormat>().unwrap(), TextFormat::Html);
        assert!("rtf".parse::<TextFormat>().is_err());
    }
}
