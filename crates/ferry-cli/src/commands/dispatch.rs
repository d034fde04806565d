use ferry_config::FerryConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, config: &FerryConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Sync(args) => commands::sync::handle(&args, config, flags).await,
        Commands::Dedupe => commands::dedupe::handle(config, flags).await,
        Commands::FixContent(args) => commands::fix_content::handle(&args, config, flags).await,
        Commands::RepairMedia => commands::repair_media::handle(config, flags).await,
        Commands::Sanitize(args) => commands::sanitize::handle(&args, config),
        Commands::Check => commands::check::handle(config, flags).await,
    }
}
