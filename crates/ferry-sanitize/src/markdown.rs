//! HTML to Markdown conversion.
//!
//! Tables and video embeds survive as HTML blocks (Markdown has no faithful
//! equivalent); every other tag is converted or dropped, so the output never
//! looks like HTML to a later pass.

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use crate::entities::escape_text;
use crate::table::{cell_text, render_table};
use crate::tree::{self, Child};
use crate::whitespace::normalize_whitespace;

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "iframe", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "ul", "video",
];

const DROPPED: &[&str] = &["script", "style", "noscript", "template", "head", "button", "svg"];

const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "youtube-nocookie.com",
    "youtu.be",
    "vimeo.com",
    "loom.com",
    "wistia.com",
    "wistia.net",
];

static FIGCAPTION: LazyLock<Selector> = LazyLock::new(|| Selector::parse("figcaption").unwrap());
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static SOURCE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("source[src]").unwrap());

/// Convert an HTML fragment to Markdown.
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    let fragment = tree::parse(html);
    normalize_whitespace(&render_children(tree::children(fragment.root_element())))
}

fn is_block(name: &str) -> bool {
    BLOCKS.contains(&name)
}

/// Render a mixed list of nodes: inline runs become paragraphs, block
/// elements become their own blocks, all separated by a blank line.
fn render_children<'a>(nodes: impl IntoIterator<Item = Child<'a>>) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut inline = String::new();

    for node in nodes {
        match node {
            Child::Element(el) if is_block(tree::name(&el)) => {
                flush_inline(&mut inline, &mut blocks);
                let block = render_block(el);
                if !block.trim().is_empty() {
                    blocks.push(block);
                }
            }
            other => inline.push_str(&render_inline(other)),
        }
    }
    flush_inline(&mut inline, &mut blocks);
    blocks.join("\n\n")
}

fn flush_inline(inline: &mut String, blocks: &mut Vec<String>) {
    let text = tidy_lines(inline);
    if !text.is_empty() {
        blocks.push(text);
    }
    inline.clear();
}

/// Collapse spacing within every line of an inline run and trim it.
fn tidy_lines(text: &str) -> String {
    text.lines()
        .map(|line| collapse_spaces(line).trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn render_block(el: ElementRef<'_>) -> String {
    match tree::name(&el) {
        heading @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
            let level = usize::from(heading.as_bytes()[1] - b'0');
            let text = single_line(&render_children(tree::children(el)));
            if text.is_empty() {
                String::new()
            } else {
                format!("{} {text}", "#".repeat(level))
            }
        }
        "blockquote" => render_blockquote(el),
        "figure" => render_figure(el),
        "ul" => render_list(el, false),
        "ol" => render_list(el, true),
        "pre" => render_pre(el),
        "hr" => "---".to_string(),
        "iframe" => render_iframe(el),
        "table" => render_table_element(el),
        "video" => el
            .value()
            .attr("src")
            .or_else(|| el.select(&SOURCE).next().and_then(|s| s.value().attr("src")))
            .map(|src| format!("[Video]({src})"))
            .unwrap_or_default(),
        _ => render_children(tree::children(el)),
    }
}

fn render_inline(node: Child<'_>) -> String {
    let el = match node {
        Child::Text(text) => return collapse_spaces(&escape_text(text)),
        Child::Element(el) => el,
    };
    match tree::name(&el) {
        "br" => "\n".to_string(),
        "img" => render_image(el),
        "strong" | "b" => wrap(&inline_children(el), "**"),
        "em" | "i" => wrap(&inline_children(el), "*"),
        "code" => {
            let code = collapse_spaces(&escape_text(&el.text().collect::<String>()));
            if code.trim().is_empty() {
                code
            } else {
                format!("`{}`", code.trim())
            }
        }
        "a" => render_link(el),
        name if DROPPED.contains(&name) => String::new(),
        name if is_block(name) => format!("\n\n{}\n\n", render_block(el)),
        _ => inline_children(el),
    }
}

fn inline_children(el: ElementRef<'_>) -> String {
    tree::children(el).map(render_inline).collect()
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn single_line(text: &str) -> String {
    collapse_spaces(text).trim().to_string()
}

/// Wrap inline text in an emphasis marker, keeping surrounding spaces
/// outside the marker.
fn wrap(inner: &str, marker: &str) -> String {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return inner.to_string();
    }
    let leading = if inner.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if inner.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{leading}{marker}{trimmed}{marker}{trailing}")
}

fn render_link(el: ElementRef<'_>) -> String {
    let text = single_line(&inline_children(el));
    let href = el.value().attr("href").map(str::trim).unwrap_or_default();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return text;
    }
    if text.is_empty() {
        return String::new();
    }
    format!("[{text}]({href})")
}

fn image_source<'a>(el: &ElementRef<'a>) -> Option<&'a str> {
    let element = el.value();
    let src = element.attr("src").map(str::trim).filter(|s| !s.is_empty() && !s.starts_with("data:"));
    src.or_else(|| element.attr("data-src").map(str::trim).filter(|s| !s.is_empty()))
}

fn render_image(el: ElementRef<'_>) -> String {
    let Some(src) = image_source(&el) else {
        return String::new();
    };
    let alt = single_line(&escape_text(el.value().attr("alt").unwrap_or_default()));
    format!("![{alt}]({src})")
}

fn render_blockquote(el: ElementRef<'_>) -> String {
    render_children(tree::children(el))
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_figure(el: ElementRef<'_>) -> String {
    let caption = el
        .select(&FIGCAPTION)
        .next()
        .map(|c| single_line(&inline_children(c)))
        .unwrap_or_default();

    let body = match el.select(&IMG).next() {
        Some(img) => render_image(img),
        None => render_children(
            tree::children(el).filter(|c| !matches!(c, Child::Element(inner) if tree::name(inner) == "figcaption")),
        ),
    };

    match (body.is_empty(), caption.is_empty()) {
        (_, true) => body,
        (true, false) => format!("*{caption}*"),
        (false, false) => format!("{body}\n*{caption}*"),
    }
}

fn render_list(el: ElementRef<'_>, ordered: bool) -> String {
    let mut lines = Vec::new();
    let items = tree::child_elements(el).filter(|c| tree::name(c) == "li");
    for (index, item) in items.enumerate() {
        let marker = if ordered {
            format!("{}. ", index + 1)
        } else {
            "- ".to_string()
        };
        let indent = " ".repeat(marker.len());
        let content = render_children(tree::children(item));
        let mut content_lines = content.lines().filter(|l| !l.trim().is_empty());
        let Some(first) = content_lines.next() else {
            continue;
        };
        lines.push(format!("{marker}{first}"));
        lines.extend(content_lines.map(|line| format!("{indent}{line}")));
    }
    lines.join("\n")
}

fn render_pre(el: ElementRef<'_>) -> String {
    let code = escape_text(&el.text().collect::<String>()).into_owned();
    let code = code.trim_matches('\n');
    if code.trim().is_empty() {
        return String::new();
    }
    format!("```\n{code}\n```")
}

fn render_iframe(el: ElementRef<'_>) -> String {
    let src = el.value().attr("src").map(str::trim).unwrap_or_default();
    if src.is_empty() {
        return String::new();
    }
    if is_video_embed(src) {
        let mut embed = String::new();
        tree::write_start_tag(el, |_, _| true, &mut embed);
        embed.push_str("</iframe>");
        embed
    } else {
        format!("[Embedded content]({src})")
    }
}

/// Whether an iframe source belongs to a known video host.
#[must_use]
pub fn is_video_embed(src: &str) -> bool {
    let absolute = if src.starts_with("//") {
        format!("https:{src}")
    } else {
        src.to_string()
    };
    let Some(host) = url::Url::parse(&absolute)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return false;
    };
    VIDEO_HOSTS
        .iter()
        .any(|video| host == *video || host.ends_with(&format!(".{video}")))
}

fn render_table_element(el: ElementRef<'_>) -> String {
    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut row_elements = Vec::new();
    collect_rows(el, false, &mut row_elements);

    for (row, in_thead) in row_elements {
        let cells: Vec<ElementRef<'_>> = tree::child_elements(row)
            .filter(|c| matches!(tree::name(c), "td" | "th"))
            .collect();
        if cells.is_empty() {
            continue;
        }
        let texts: Vec<String> = cells.iter().map(|c| cell_text(*c)).collect();
        let all_header_cells = cells.iter().all(|c| tree::name(c) == "th");
        if header.is_none() && rows.is_empty() && (in_thead || all_header_cells) {
            header = Some(texts);
        } else {
            rows.push(texts);
        }
    }

    if header.is_none() && rows.is_empty() {
        return String::new();
    }
    render_table(header.as_deref(), &rows)
}

/// Rows in document order, flagged when they sit inside `<thead>`.
fn collect_rows<'a>(el: ElementRef<'a>, in_thead: bool, out: &mut Vec<(ElementRef<'a>, bool)>) {
    for child in tree::child_elements(el) {
        match tree::name(&child) {
            "tr" => out.push((child, in_thead)),
            "table" => {}
            "thead" => collect_rows(child, true, out),
            _ => collect_rows(child, in_thead, out),
        }
    }
}
