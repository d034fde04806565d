//! Recovery of tables that the old editor flattened into paragraphs, and the
//! canonical table markup shared with the Markdown converter.
//!
//! A run of sibling paragraphs separated only by whitespace is searched for
//! one of the known header sequences, in three flattened forms:
//!
//! ```text
//! A: <p>Variable</p><p>Category</p><p>Subcategory</p><p>Details</p>
//!    <p>cell</p> x (rows * 4)
//! B: <p>Variable</p><p>Category</p><p>Subcategory</p><p>Details</p>
//!    <p>cell | cell | cell | cell</p> x rows
//! C: <p>Variable | Category | Subcategory | Details</p>
//!    <p>cell | cell | cell | cell</p> x rows
//! ```
//!
//! Cells split on `|` or `<br>`. Form A stops at the last complete row, so
//! trailing cells that do not fill a row stay paragraphs.

use scraper::ElementRef;

use crate::entities::escape_text;
use crate::tree::{self, Child};

/// Header sequences that mark a flattened table.
pub const KNOWN_HEADERS: &[&[&str]] = &[
    &["Variable", "Category", "Subcategory", "Details"],
    &["Metric", "Definition", "Source", "Frequency"],
];

/// Replace every recognisable flattened table in `html` with canonical
/// table markup. Anything not recognised is serialized unchanged.
#[must_use]
pub fn recover_tables(html: &str) -> String {
    let fragment = tree::parse(html);
    let mut out = String::with_capacity(html.len());
    write_recovered_children(fragment.root_element(), &mut out);
    out
}

struct Replacement {
    first: usize,
    last: usize,
    markup: String,
}

fn write_recovered_children(el: ElementRef<'_>, out: &mut String) {
    let nodes: Vec<Child<'_>> = tree::children(el).collect();
    let replacements = find_tables(&nodes);

    let mut index = 0;
    let mut pending = replacements.iter().peekable();
    while index < nodes.len() {
        if let Some(replacement) = pending.next_if(|r| r.first == index) {
            out.push_str(&replacement.markup);
            index = replacement.last + 1;
            continue;
        }
        match nodes[index] {
            Child::Element(inner) if tree::holds_markup(tree::name(&inner)) => {
                tree::write_start_tag(inner, |_, _| true, out);
                write_recovered_children(inner, out);
                tree::write_end_tag(inner, out);
            }
            child => tree::write_child(child, out),
        }
        index += 1;
    }
}

/// Tables found among sibling nodes, in document order.
fn find_tables(nodes: &[Child<'_>]) -> Vec<Replacement> {
    let mut replacements = Vec::new();
    for run in paragraph_runs(nodes) {
        let paragraphs: Vec<ElementRef<'_>> = run.iter().map(|(_, p)| *p).collect();
        let mut i = 0;
        while i < paragraphs.len() {
            let Some((consumed, header, rows)) = detect_at(&paragraphs[i..]) else {
                i += 1;
                continue;
            };
            tracing::debug!(columns = header.len(), rows = rows.len(), "recovered flattened table");
            replacements.push(Replacement {
                first: run[i].0,
                last: run[i + consumed - 1].0,
                markup: render_table(Some(&header), &rows),
            });
            i += consumed;
        }
    }
    replacements
}

/// Groups of `<p>` siblings separated only by whitespace, with their
/// positions among the siblings.
fn paragraph_runs<'a>(nodes: &[Child<'a>]) -> Vec<Vec<(usize, ElementRef<'a>)>> {
    let mut runs = Vec::new();
    let mut current: Vec<(usize, ElementRef<'a>)> = Vec::new();
    for (index, child) in nodes.iter().enumerate() {
        match child {
            Child::Element(el) if tree::name(el) == "p" => current.push((index, *el)),
            other if other.is_blank_text() => {}
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Render a table in canonical form. Cells are expected to be escaped text.
#[must_use]
pub fn render_table(header: Option<&[String]>, rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table>\n");
    if let Some(header) = header {
        out.push_str("<thead>\n<tr>");
        for cell in header {
            out.push_str(&format!("<th>{cell}</th>"));
        }
        out.push_str("</tr>\n</thead>\n");
    }
    out.push_str("<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{cell}</td>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
    out
}

/// Escaped plain text of a cell with spacing collapsed.
pub(crate) fn cell_text(el: ElementRef<'_>) -> String {
    squash(&el.text().collect::<String>())
}

fn squash(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    escape_text(&words.join(" ")).into_owned()
}

type Detected = (usize, Vec<String>, Vec<Vec<String>>);

fn detect_at(run: &[ElementRef<'_>]) -> Option<Detected> {
    KNOWN_HEADERS
        .iter()
        .find_map(|labels| one_label_per_paragraph(run, labels).or_else(|| header_paragraph(run, labels)))
}

fn one_label_per_paragraph(run: &[ElementRef<'_>], labels: &[&str]) -> Option<Detected> {
    let columns = labels.len();
    if run.len() <= columns {
        return None;
    }
    let header: Vec<String> = run[..columns].iter().map(|p| cell_text(*p)).collect();
    if !matches_labels(&header, labels) {
        return None;
    }
    let body = &run[columns..];

    let split_rows = whole_rows(body, columns);
    if !split_rows.is_empty() {
        return Some((columns + split_rows.len(), header, split_rows));
    }

    let complete = body.len() / columns * columns;
    if complete == 0 {
        return None;
    }
    let rows = body[..complete]
        .chunks(columns)
        .map(|chunk| chunk.iter().map(|p| cell_text(*p)).collect())
        .collect();
    Some((columns + complete, header, rows))
}

fn header_paragraph(run: &[ElementRef<'_>], labels: &[&str]) -> Option<Detected> {
    let header = split_cells(*run.first()?);
    if !matches_labels(&header, labels) {
        return None;
    }
    let rows = whole_rows(&run[1..], labels.len());
    if rows.is_empty() {
        return None;
    }
    Some((rows.len() + 1, header, rows))
}

/// Leading paragraphs that each split into exactly `columns` cells.
fn whole_rows(paragraphs: &[ElementRef<'_>], columns: usize) -> Vec<Vec<String>> {
    paragraphs
        .iter()
        .map(|p| split_cells(*p))
        .take_while(|cells| cells.len() == columns)
        .collect()
}

fn matches_labels(cells: &[String], labels: &[&str]) -> bool {
    cells.len() == labels.len()
        && cells
            .iter()
            .zip(labels)
            .all(|(cell, label)| cell.eq_ignore_ascii_case(label))
}

/// Split a paragraph on line breaks and pipes; a leading or trailing pipe
/// does not produce an empty cell.
fn split_cells(p: ElementRef<'_>) -> Vec<String> {
    let text = tree::text_with_breaks(p);
    let mut cells: Vec<String> = text.split(['\n', '|']).map(squash).collect();
    if cells.first().is_some_and(String::is_empty) {
        cells.remove(0);
    }
    if cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
    cells
}
