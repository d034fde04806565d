use ferry_config::FerryConfig;
use ferry_core::ContentKind;
use ferry_sync::{DedupeReport, SyncContext};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::commands::connections::Connections;
use crate::output::output_rows;
use crate::progress;

const COLUMNS: &[&str] = &["kind", "base", "keep", "remove", "status"];

#[derive(Debug, Serialize)]
struct DedupeRow {
    kind: ContentKind,
    base: String,
    keep: String,
    remove: Vec<String>,
    status: &'static str,
}

fn rows(kind: ContentKind, report: &DedupeReport) -> Vec<DedupeRow> {
    let status = if report.simulated {
        "planned"
    } else if report.failed > 0 {
        "partial"
    } else {
        "trashed"
    };
    report
        .groups
        .iter()
        .map(|group| DedupeRow {
            kind,
            base: group.base.clone(),
            keep: format!("{} {}", group.keep.id, group.keep.slug),
            remove: group.remove.iter().map(|r| format!("{} {}", r.id, r.slug)).collect(),
            status,
        })
        .collect()
}

/// Handle `ferry dedupe`.
pub async fn handle(config: &FerryConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let run = bootstrap::run_config(flags, config)?;
    let connections = Connections::open(config)?;
    let heuristic = connections.heuristic(&run);
    let driver = connections.driver(&heuristic, run);

    let mut ctx = SyncContext::new();
    let mut table = Vec::new();
    let mut failed = 0;
    for &kind in driver.run().scope.kinds() {
        let label = format!("deduplicating {}", kind.wp_rest_base());
        let report = progress::track(&label, driver.dedupe_kind(kind, &mut ctx)).await?;
        tracing::info!(
            %kind,
            groups = report.groups.len(),
            planned = report.planned(),
            trashed = report.trashed,
            failed = report.failed,
            "dedupe finished"
        );
        failed += report.failed;
        table.extend(rows(kind, &report));
    }

    output_rows(&table, COLUMNS, flags.format)?;
    if failed > 0 {
        anyhow::bail!("{failed} record(s) could not be trashed");
    }
    Ok(())
}
