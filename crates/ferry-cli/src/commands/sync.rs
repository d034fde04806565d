use ferry_config::FerryConfig;
use ferry_sync::SyncContext;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SyncArgs;
use crate::commands::connections::Connections;
use crate::commands::summary;
use crate::progress;

/// Handle `ferry sync`.
pub async fn handle(args: &SyncArgs, config: &FerryConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let run = bootstrap::run_config(flags, config)?
        .with_update_existing(args.update)
        .with_text_format(args.target.into());
    let connections = Connections::open(config)?;
    let heuristic = connections.heuristic(&run);
    let driver = connections.driver(&heuristic, run);

    let mut ctx = SyncContext::new();
    let mut results = Vec::new();
    for &kind in driver.run().scope.kinds() {
        let label = format!("syncing {}", kind.strapi_collection());
        let result = progress::track(&label, driver.sync_kind(kind, &mut ctx)).await?;
        results.push((kind, result));
    }

    if driver.run().dry_run {
        tracing::info!("dry run: nothing was written to WordPress");
    }
    summary::report(&results, flags)
}
