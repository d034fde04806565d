use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a list of serializable rows. In table mode `columns` picks and
/// orders the fields shown; JSON modes include every field.
pub fn render_rows<T: Serialize>(rows: &[T], columns: &[&str], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Raw => Ok(serde_json::to_string(rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok(String::from("(no rows)"));
            }
            let cells = rows
                .iter()
                .map(|row| -> anyhow::Result<Vec<String>> {
                    let value = serde_json::to_value(row)?;
                    Ok(columns
                        .iter()
                        .map(|column| value.get(column).map_or_else(|| String::from("-"), value_to_cell))
                        .collect())
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(table::render_table(columns, &cells, table_options()))
        }
    }
}

/// Print rows in the requested format.
pub fn output_rows<T: Serialize>(rows: &[T], columns: &[&str], format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render_rows(rows, columns, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(value_to_cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render_rows;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        kind: &'static str,
        created: u32,
        note: Option<&'static str>,
        ids: Vec<u64>,
    }

    fn rows() -> Vec<Row> {
        vec![Row {
            kind: "work",
            created: 2,
            note: None,
            ids: vec![3, 7],
        }]
    }

    #[test]
    fn table_follows_column_order() {
        let out = render_rows(&rows(), &["kind", "ids", "created", "note"], OutputFormat::Table).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "kind  ids   created  note");
        assert_eq!(lines[2], "work  3, 7        2  -");
    }

    #[test]
    fn json_includes_every_field() {
        let out = render_rows(&rows(), &["kind"], OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["created"], 2);
        assert_eq!(parsed[0]["ids"], serde_json::json!([3, 7]));
    }

    #[test]
    fn raw_is_one_line() {
        let out = render_rows(&rows(), &["kind"], OutputFormat::Raw).unwrap();
        assert!(!out.contains('\n'));
    }

    #[test]
    fn empty_tables_say_so() {
        let out = render_rows::<Row>(&[], &["kind"], OutputFormat::Table).unwrap();
        assert_eq!(out, "(no rows)");
    }
}
