//! Markup cleanup applied to every HTML input, whatever the target format.

use scraper::ElementRef;

use crate::entities::escape_text;
use crate::noise::{is_noise_label, strip_leaked_css};
use crate::tree::{self, Child};

const DISCARDED: &[&str] = &["script", "style", "noscript", "template"];

/// Remove scripts, styles, comments, editor cruft attributes, leaked button
/// CSS and paragraphs left empty by any of those.
#[must_use]
pub fn clean_html(html: &str) -> String {
    let fragment = tree::parse(html);
    let mut out = String::with_capacity(html.len());
    write_clean_children(fragment.root_element(), &mut out);
    out
}

fn write_clean_children(el: ElementRef<'_>, out: &mut String) {
    for child in tree::children(el) {
        match child {
            Child::Text(text) => out.push_str(&escape_text(&strip_leaked_css(text))),
            Child::Element(inner) => write_clean_element(inner, out),
        }
    }
}

fn write_clean_element(el: ElementRef<'_>, out: &mut String) {
    let name = tree::name(&el);
    if DISCARDED.contains(&name) || (name == "p" && is_empty_paragraph(el)) {
        return;
    }
    tree::write_start_tag(el, |attr, value| !is_cruft(attr, value), out);
    if tree::is_void(name) {
        return;
    }
    if tree::holds_markup(name) {
        write_clean_children(el, out);
    } else {
        out.extend(el.text());
    }
    tree::write_end_tag(el, out);
}

/// A paragraph holding only whitespace, line breaks, leaked CSS or an
/// orphaned button label.
fn is_empty_paragraph(p: ElementRef<'_>) -> bool {
    let blank = tree::children(p).all(|child| match child {
        Child::Text(text) => strip_leaked_css(text).trim().is_empty(),
        Child::Element(inner) => tree::name(&inner) == "br",
    });
    blank || is_noise_label(&p.text().collect::<String>())
}

/// Inline styles, classes, empty ids and `data-*` (except lazy-load sources).
fn is_cruft(name: &str, value: &str) -> bool {
    match name {
        "style" | "class" => true,
        "id" => value.trim().is_empty(),
        "data-src" | "data-srcset" => false,
        _ => name.starts_with("data-"),
    }
}
