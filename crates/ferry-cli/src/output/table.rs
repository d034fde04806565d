//! Plain aligned tables for terminal output.

const MIN_COLUMN: usize = 4;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render `rows` under `headers`. Missing cells render as `-`; numeric cells
/// are right-aligned.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain([header.chars().count(), MIN_COLUMN])
                .max()
                .unwrap_or(MIN_COLUMN)
        })
        .collect::<Vec<_>>();
    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = join_cells(headers.iter().zip(&widths).map(|(header, &width)| {
        let text = truncate(header, width);
        pad(&text, text.chars().count(), width, false)
    }));

    let mut lines = vec![header_line.clone(), "-".repeat(header_line.chars().count())];
    for row in rows {
        lines.push(join_cells(widths.iter().enumerate().map(|(index, &width)| {
            let text = truncate(row.get(index).map_or("-", String::as_str), width);
            let visible = text.chars().count();
            let numeric = is_numeric(&text);
            let text = if options.color { colorize(&text) } else { text };
            pad(&text, visible, width, numeric)
        })));
    }
    lines.join("\n")
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(GAP).trim_end().to_string()
}

/// Narrow the widest column one character at a time until the table fits.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    while widths.iter().sum::<usize>() + gaps > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].chars().count().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            return;
        };
        widths[index] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out = value.chars().take(width.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

fn pad(text: &str, visible: usize, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(visible));
    if right_align {
        format!("{fill}{text}")
    } else {
        format!("{text}{fill}")
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

fn colorize(value: &str) -> String {
    let code = match value.to_ascii_lowercase().as_str() {
        "ok" | "created" | "updated" | "trashed" | "reachable" => "32",
        "skipped" | "planned" | "dry-run" | "would create" | "would update" => "33",
        "failed" | "unreachable" | "unauthorized" | "error" => "31",
        _ => return value.to_string(),
    };
    format!("\u{1b}[{code}m{value}\u{1b}[0m")
}
