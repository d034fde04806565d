use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use ferry_cms::{StrapiClient, WordPressClient};
use ferry_config::FerryConfig;
use ferry_sanitize::UrlPolicy;
use ferry_sync::{MappedMediaResolver, RunConfig};

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<FerryConfig> {
    if let Some(path) = &flags.env_file
        && !path.exists()
    {
        anyhow::bail!("env file not found: {}", path.display());
    }

    FerryConfig::load_with_dotenv(flags.env_file.as_deref()).context("failed to load ferry configuration")
}

/// Resolve the write gate and scope for a command that touches WordPress.
pub fn run_config(flags: &GlobalFlags, config: &FerryConfig) -> anyhow::Result<RunConfig> {
    let run = RunConfig::gate(flags.yes, flags.dry_run, &config.sync)?;
    Ok(run.with_scope(flags.scope()))
}

pub fn url_policy(config: &FerryConfig) -> UrlPolicy {
    UrlPolicy::new(config.source_hosts(), config.site.public_url.as_str(), config.asset_base())
}

const fn timeout(config: &FerryConfig) -> Duration {
    Duration::from_secs(config.sync.timeout_secs)
}

pub fn strapi_client(config: &FerryConfig) -> anyhow::Result<StrapiClient> {
    let strapi = config.require_strapi()?;
    StrapiClient::new(strapi, timeout(config)).context("failed to build Strapi client")
}

pub fn wordpress_client(config: &FerryConfig) -> anyhow::Result<WordPressClient> {
    let wordpress = config.require_wordpress()?;
    WordPressClient::new(wordpress, timeout(config)).context("failed to build WordPress client")
}

/// The configured media map, if `sync.media_map_path` is set.
pub fn media_map(config: &FerryConfig) -> anyhow::Result<Option<MappedMediaResolver>> {
    let path = config.sync.media_map_path.trim();
    if path.is_empty() {
        return Ok(None);
    }

    let resolver = MappedMediaResolver::from_path(Path::new(path))?;
    tracing::info!(path, entries = resolver.len(), "using media map");
    Ok(Some(resolver))
}
