//! Strapi (source CMS) configuration.

use serde::{Deserialize, Serialize};

/// Default page size for collection listing.
const fn default_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrapiConfig {
    /// Base URL of the Strapi server (e.g., `https://cms.example.com`).
    #[serde(default)]
    pub url: String,

    /// API token sent as a bearer token. Usually the bootstrap token the
    /// server generated on first start.
    #[serde(default)]
    pub api_token: String,

    /// Publicly reachable URL of the same server. Used as the base URL when
    /// `url` is unset.
    #[serde(default)]
    pub public_url: String,

    /// `pagination[pageSize]` for collection listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for StrapiConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_token: String::new(),
            public_url: String::new(),
            page_size: default_page_size(),
        }
    }
}

impl StrapiConfig {
    /// Check if the Strapi config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.api_token.is_empty()
    }

    /// Names of required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.url.is_empty() {
            missing.push("url");
        }
        if self.api_token.is_empty() {
            missing.push("api_token");
        }
        missing
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = StrapiConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.page_size, 100);
        assert_eq!(config.missing_fields(), vec!["url", "api_token"]);
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let config = StrapiConfig {
            url: "https://cms.example.com/".into(),
            api_token: "token".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(config.base_url(), "https://cms.example.com");
    }
}
