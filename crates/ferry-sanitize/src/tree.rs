//! Thin layer over the `scraper` fragment tree: child iteration and
//! serialization back to markup.

use scraper::{ElementRef, Html, Node};

use crate::entities::escape_text;

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes", "noscript"];

/// Elements whose leading newline the parser swallows.
const LEADING_NEWLINE: &[&str] = &["pre", "textarea", "listing"];

/// A child that matters for rendering. Comments and processing
/// instructions are dropped.
#[derive(Clone, Copy)]
pub(crate) enum Child<'a> {
    Text(&'a str),
    Element(ElementRef<'a>),
}

impl<'a> Child<'a> {
    pub(crate) fn element(self) -> Option<ElementRef<'a>> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    pub(crate) fn is_blank_text(self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

pub(crate) fn parse(html: &str) -> Html {
    Html::parse_fragment(html)
}

pub(crate) fn children<'a>(el: ElementRef<'a>) -> impl Iterator<Item = Child<'a>> + 'a {
    el.children().filter_map(|node| match node.value() {
        Node::Text(text) => Some(Child::Text(&**text)),
        Node::Element(_) => ElementRef::wrap(node).map(Child::Element),
        _ => None,
    })
}

pub(crate) fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    children(el).filter_map(Child::element)
}

pub(crate) fn name<'a>(el: &ElementRef<'a>) -> &'a str {
    el.value().name()
}

pub(crate) fn is_void(name: &str) -> bool {
    VOID.contains(&name)
}

/// Whether the children of `name` are parsed as markup.
pub(crate) fn holds_markup(name: &str) -> bool {
    !is_void(name) && !RAW_TEXT.contains(&name)
}

/// All text below `el`, with `<br>` turned into a newline.
pub(crate) fn text_with_breaks(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in children(el) {
        match child {
            Child::Text(text) => out.push_str(text),
            Child::Element(inner) if name(&inner) == "br" => out.push('\n'),
            Child::Element(inner) => out.push_str(&text_with_breaks(inner)),
        }
    }
    out
}

/// Write the start tag of `el`, keeping the attributes `keep` accepts in
/// source order. Empty values are written as bare attribute names.
pub(crate) fn write_start_tag(el: ElementRef<'_>, keep: impl Fn(&str, &str) -> bool, out: &mut String) {
    let tag = name(&el);
    out.push('<');
    out.push_str(tag);
    for (attr, value) in el.value().attrs().filter(|&(attr, value)| keep(attr, value)) {
        out.push(' ');
        out.push_str(attr);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
    }
    out.push('>');
    if LEADING_NEWLINE.contains(&tag)
        && matches!(children(el).next(), Some(Child::Text(text)) if text.starts_with('\n'))
    {
        out.push('\n');
    }
}

pub(crate) fn write_end_tag(el: ElementRef<'_>, out: &mut String) {
    out.push_str("</");
    out.push_str(name(&el));
    out.push('>');
}

/// Serialize `el` and everything below it unchanged.
pub(crate) fn write_element(el: ElementRef<'_>, out: &mut String) {
    write_start_tag(el, |_, _| true, out);
    if is_void(name(&el)) {
        return;
    }
    if RAW_TEXT.contains(&name(&el)) {
        out.extend(el.text());
    } else {
        write_children(el, out);
    }
    write_end_tag(el, out);
}

pub(crate) fn write_children(el: ElementRef<'_>, out: &mut String) {
    for child in children(el) {
        write_child(child, out);
    }
}

pub(crate) fn write_child(child: Child<'_>, out: &mut String) {
    match child {
        Child::Text(text) => out.push_str(&escape_text(text)),
        Child::Element(el) => write_element(el, out),
    }
}
