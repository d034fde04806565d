//! Public site and asset host settings used for rich-text URL rewriting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Public site origin that content links should point at
    /// (e.g., `https://www.example.com`).
    #[serde(default)]
    pub public_url: String,

    /// Origin that actually hosts uploaded binaries. Relative asset paths are
    /// made absolute against it. Defaults to the Strapi URL.
    #[serde(default)]
    pub asset_url: String,

    /// Extra admin/source hosts whose links are rewritten to `public_url`,
    /// in addition to the Strapi and WordPress hosts.
    #[serde(default)]
    pub source_hosts: Vec<String>,
}

impl SiteConfig {
    pub fn has_public_url(&self) -> bool {
        !self.public_url.is_empty()
    }
}
