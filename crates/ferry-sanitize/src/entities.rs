//! Escaping of parsed text on its way back out.
//!
//! The parser decodes every entity. `&`, `<` and `>` are encoded again so the
//! output never grows markup that a second pass would interpret; a
//! non-breaking space becomes a plain one.

use std::borrow::Cow;

#[must_use]
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    if text.contains('\u{a0}') {
        Cow::Owned(html_escape::encode_text(&text.replace('\u{a0}', " ")).into_owned())
    } else {
        html_escape::encode_text(text)
    }
}
