use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::TargetFormat;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Copy Works and Insights from Strapi to WordPress.
    Sync(SyncArgs),
    /// Trash WordPress records that duplicate another record's base slug.
    Dedupe,
    /// Re-sanitize rich text already stored in WordPress.
    FixContent(FixContentArgs),
    /// Attach missing images to WordPress records from their Strapi source.
    RepairMedia,
    /// Sanitize a rich-text document offline (file or stdin to stdout).
    Sanitize(SanitizeArgs),
    /// Verify that both CMSes are reachable and accept the credentials.
    Check,
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// Update records that already exist instead of skipping them.
    #[arg(long)]
    pub update: bool,

    /// Representation rich text is written in.
    #[arg(long, value_enum, default_value_t = TargetFormat::Markdown)]
    pub target: TargetFormat,
}

#[derive(Clone, Debug, Args)]
pub struct FixContentArgs {
    /// Representation rich text is rewritten to.
    #[arg(long, value_enum, default_value_t = TargetFormat::Markdown)]
    pub target: TargetFormat,
}

#[derive(Clone, Debug, Args)]
pub struct SanitizeArgs {
    /// Input file; reads stdin when omitted or `-`.
    pub input: Option<PathBuf>,

    /// Output representation.
    #[arg(long, value_enum, default_value_t = TargetFormat::Markdown)]
    pub target: TargetFormat,

    /// Rewrite admin links and relative upload paths using the configured hosts.
    #[arg(long)]
    pub rewrite_urls: bool,
}
