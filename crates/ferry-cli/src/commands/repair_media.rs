use ferry_config::FerryConfig;
use ferry_sync::SyncContext;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::commands::connections::Connections;
use crate::commands::summary;
use crate::progress;

/// Handle `ferry repair-media`.
pub async fn handle(config: &FerryConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let run = bootstrap::run_config(flags, config)?;
    let connections = Connections::open(config)?;
    let heuristic = connections.heuristic(&run);
    let driver = connections.driver(&heuristic, run);

    let mut ctx = SyncContext::new();
    let mut results = Vec::new();
    for &kind in driver.run().scope.kinds() {
        let label = format!("repairing {} media", kind.as_str());
        let result = progress::track(&label, driver.repair_media_kind(kind, &mut ctx)).await?;
        results.push((kind, result));
    }
    summary::report(&results, flags)
}
