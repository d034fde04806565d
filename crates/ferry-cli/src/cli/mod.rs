use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat, TargetFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `ferry` binary.
#[derive(Debug, Parser)]
#[command(name = "ferry", version, about = "ferry - Strapi to WordPress content sync")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Confirm writes to WordPress
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Report what would be written without writing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Only process Works
    #[arg(long, global = true)]
    pub works_only: bool,

    /// Only process Insights
    #[arg(long, global = true)]
    pub insights_only: bool,

    /// Load environment variables from this file instead of `.env`
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            yes: self.yes,
            dry_run: self.dry_run,
            works_only: self.works_only,
            insights_only: self.insights_only,
            env_file: self.env_file.clone(),
        }
    }
}
