use ferry_config::FerryConfig;
use ferry_sync::SyncContext;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::FixContentArgs;
use crate::commands::connections::Connections;
use crate::commands::summary;
use crate::progress;

/// Handle `ferry fix-content`.
pub async fn handle(args: &FixContentArgs, config: &FerryConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let run = bootstrap::run_config(flags, config)?.with_text_format(args.target.into());
    let connections = Connections::open(config)?;
    let heuristic = connections.heuristic(&run);
    let driver = connections.driver(&heuristic, run);

    let mut ctx = SyncContext::new();
    let mut results = Vec::new();
    for &kind in driver.run().scope.kinds() {
        let label = format!("re-sanitizing {}", kind.wp_rest_base());
        let result = progress::track(&label, driver.fix_content_kind(kind, &mut ctx)).await?;
        results.push((kind, result));
    }
    summary::report(&results, flags)
}
