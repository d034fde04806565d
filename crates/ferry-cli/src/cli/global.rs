use std::path::PathBuf;

use clap::ValueEnum;
use ferry_sanitize::TextFormat;
use ferry_sync::Scope;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Raw,
}

/// Representation rich text is converted to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum TargetFormat {
    #[default]
    Markdown,
    Html,
}

impl From<TargetFormat> for TextFormat {
    fn from(format: TargetFormat) -> Self {
        match format {
            TargetFormat::Markdown => Self::Markdown,
            TargetFormat::Html => Self::Html,
        }
    }
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub yes: bool,
    pub dry_run: bool,
    pub works_only: bool,
    pub insights_only: bool,
    pub env_file: Option<PathBuf>,
}

impl GlobalFlags {
    #[must_use]
    pub const fn scope(&self) -> Scope {
        Scope::from_flags(self.works_only, self.insights_only)
    }
}
