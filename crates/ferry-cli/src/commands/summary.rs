use ferry_core::{ContentKind, SyncResult};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output_rows;

pub const COLUMNS: &[&str] = &["kind", "mode", "created", "updated", "skipped", "failed"];

/// One line of a pass summary.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SummaryRow {
    pub kind: String,
    pub mode: &'static str,
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl SummaryRow {
    fn new(kind: impl Into<String>, result: &SyncResult) -> Self {
        Self {
            kind: kind.into(),
            mode: if result.simulated { "dry-run" } else { "live" },
            created: result.created,
            updated: result.updated,
            skipped: result.skipped,
            failed: result.failed,
        }
    }
}

/// Per-kind rows, plus a total row when more than one kind ran.
pub fn rows(results: &[(ContentKind, SyncResult)]) -> Vec<SummaryRow> {
    let mut rows = results
        .iter()
        .map(|(kind, result)| SummaryRow::new(kind.as_str(), result))
        .collect::<Vec<_>>();
    if results.len() > 1 {
        let mut total = SyncResult::default();
        for (_, result) in results {
            total.merge(result);
        }
        rows.push(SummaryRow::new("total", &total));
    }
    rows
}

/// Print the summary; any failed item makes the command fail.
pub fn report(results: &[(ContentKind, SyncResult)], flags: &GlobalFlags) -> anyhow::Result<()> {
    output_rows(&rows(results), COLUMNS, flags.format)?;

    let failed = results.iter().map(|(_, result)| result.failed).sum::<u32>();
    if failed > 0 {
        anyhow::bail!("{failed} item(s) failed; see the log above for details");
    }
    Ok(())
}
