//! Final whitespace pass shared by every output format.

/// Normalize line endings and blank lines.
///
/// Trailing whitespace is stripped from every line, runs of blank lines
/// collapse to a single blank line, leading blank lines are dropped and the
/// result ends with exactly one newline. Empty input stays empty.
#[must_use]
pub fn normalize_whitespace(input: &str) -> String {
    let unified = input.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    let mut blank_run = 0usize;
    for line in unified.lines().map(str::trim_end) {
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        blank_run = 0;
        out.push_str(line);
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out
}
