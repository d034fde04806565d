use ferry_cms::{StrapiClient, WordPressClient};
use ferry_config::FerryConfig;
use ferry_sanitize::UrlPolicy;
use ferry_sync::{HeuristicMediaResolver, MappedMediaResolver, MediaResolver, RunConfig, SyncDriver, TokioSleeper};

use crate::bootstrap;

/// Both CMS clients plus what a driver needs besides them.
pub struct Connections {
    strapi: StrapiClient,
    wordpress: WordPressClient,
    media_map: Option<MappedMediaResolver>,
    urls: UrlPolicy,
    sleeper: TokioSleeper,
}

impl Connections {
    pub fn open(config: &FerryConfig) -> anyhow::Result<Self> {
        Ok(Self {
            strapi: bootstrap::strapi_client(config)?,
            wordpress: bootstrap::wordpress_client(config)?,
            media_map: bootstrap::media_map(config)?,
            urls: bootstrap::url_policy(config),
            sleeper: TokioSleeper,
        })
    }

    pub fn heuristic(&self, run: &RunConfig) -> HeuristicMediaResolver<'_> {
        HeuristicMediaResolver::new(&self.strapi, &self.wordpress, &self.sleeper, run)
    }

    /// A driver that resolves media from the media map when one is
    /// configured, otherwise through `heuristic`.
    pub fn driver<'a>(&'a self, heuristic: &'a HeuristicMediaResolver<'a>, run: RunConfig) -> SyncDriver<'a> {
        let media: &dyn MediaResolver = match &self.media_map {
            Some(map) => map,
            None => heuristic,
        };
        SyncDriver::new(&self.strapi, &self.wordpress, media, &self.sleeper, run).with_url_policy(self.urls.clone())
    }
}
