//! # ferry-config
//!
//! Layered configuration loading for ferry using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FERRY_*` prefix, `__` as separator)
//! 2. Legacy script variables (`STRAPI_URL`, `WP_APP_PASSWORD`, ...)
//! 3. Project-level `ferry.toml`
//! 4. User-level `~/.config/ferry/config.toml`
//! 5. Built-in defaults
//!
//! After extraction, missing base URLs fall back to their "public" siblings
//! (`strapi.url` ← `strapi.public_url`, `wordpress.url` ← `wordpress.public_url`).
//!
//! # Environment Variable Mapping
//!
//! Figment maps `FERRY_STRAPI__API_TOKEN` -> `strapi.api_token`,
//! `FERRY_SYNC__DRY_RUN` -> `sync.dry_run`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use ferry_config::FerryConfig;
//!
//! let config = FerryConfig::load_with_dotenv(None).expect("config");
//! if config.wordpress.is_configured() {
//!     println!("WordPress REST root: {}", config.wordpress.rest_root());
//! }
//! ```

mod error;
mod site;
mod strapi;
mod sync;
mod wordpress;

pub use error::ConfigError;
pub use site::SiteConfig;
pub use strapi::StrapiConfig;
pub use sync::SyncConfig;
pub use wordpress::WordPressConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Variable names used by the standalone migration scripts, mapped onto
/// config paths so existing `.env` files keep working.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("STRAPI_URL", "strapi.url"),
    ("STRAPI_API_TOKEN", "strapi.api_token"),
    ("STRAPI_TOKEN", "strapi.api_token"),
    ("PUBLIC_STRAPI_URL", "strapi.public_url"),
    ("WP_URL", "wordpress.url"),
    ("WP_USERNAME", "wordpress.username"),
    ("WP_APP_PASSWORD", "wordpress.app_password"),
    ("PUBLIC_WP_URL", "wordpress.public_url"),
    ("PUBLIC_SITE_URL", "site.public_url"),
    ("DRY_RUN", "sync.dry_run"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FerryConfig {
    #[serde(default)]
    pub strapi: StrapiConfig,
    #[serde(default)]
    pub wordpress: WordPressConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl FerryConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// With an explicit path, that file must load. Without one, `.env.local`
    /// and `.env` are tried from the workspace root and the current directory;
    /// absence is not an error. Variables already set in the process win.
    pub fn load_with_dotenv(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = env_file {
            dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            })?;
        } else {
            Self::load_dotenv_from_workspace();
        }
        Self::load()
    }

    /// Extract from a prepared figment and apply URL fallbacks.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let mut config: Self = figment.extract()?;
        config.apply_fallbacks();
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from("ferry.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Legacy script variables
        figment = figment.merge(Self::legacy_env());

        // Layer 4: Prefixed environment variables (highest priority)
        figment.merge(Env::prefixed("FERRY_").split("__"))
    }

    /// Fill empty base URLs from their public counterparts and normalize
    /// trailing slashes.
    pub fn apply_fallbacks(&mut self) {
        if self.strapi.url.is_empty() && !self.strapi.public_url.is_empty() {
            self.strapi.url.clone_from(&self.strapi.public_url);
        }
        if self.wordpress.url.is_empty() && !self.wordpress.public_url.is_empty() {
            self.wordpress.url.clone_from(&self.wordpress.public_url);
        }
        for url in [
            &mut self.strapi.url,
            &mut self.wordpress.url,
            &mut self.site.public_url,
            &mut self.site.asset_url,
        ] {
            let trimmed_len = url.trim_end_matches('/').len();
            url.truncate(trimmed_len);
        }
    }

    /// Fail unless the Strapi section can be used.
    pub fn require_strapi(&self) -> Result<&StrapiConfig, ConfigError> {
        if self.strapi.is_configured() {
            Ok(&self.strapi)
        } else {
            Err(ConfigError::NotConfigured {
                section: "strapi".into(),
                missing: self.strapi.missing_fields().join(", "),
            })
        }
    }

    /// Fail unless the WordPress section can be used.
    pub fn require_wordpress(&self) -> Result<&WordPressConfig, ConfigError> {
        if self.wordpress.is_configured() {
            Ok(&self.wordpress)
        } else {
            Err(ConfigError::NotConfigured {
                section: "wordpress".into(),
                missing: self.wordpress.missing_fields().join(", "),
            })
        }
    }

    /// Hosts whose links count as admin/source links for rewriting: the
    /// Strapi and WordPress hosts plus `site.source_hosts`, minus the public
    /// site host itself.
    pub fn source_hosts(&self) -> Vec<String> {
        let public_host = host_of(&self.site.public_url);
        let mut hosts = Vec::new();
        for candidate in [
            host_of(&self.strapi.url),
            host_of(&self.strapi.public_url),
            host_of(&self.wordpress.url),
        ]
        .into_iter()
        .flatten()
        .chain(self.site.source_hosts.iter().map(|h| h.to_ascii_lowercase()))
        {
            if Some(&candidate) != public_host.as_ref() && !hosts.contains(&candidate) {
                hosts.push(candidate);
            }
        }
        hosts
    }

    /// Origin hosting uploaded binaries: `site.asset_url`, else the Strapi URL.
    pub fn asset_base(&self) -> &str {
        if self.site.asset_url.is_empty() {
            self.strapi.base_url()
        } else {
            &self.site.asset_url
        }
    }

    fn legacy_env() -> Env {
        Env::raw().filter_map(|key| {
            LEGACY_ENV
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map(|(_, path)| (*path).into())
        })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ferry").join("config.toml"))
    }

    /// Load `.env.local` then `.env` from the workspace root or current dir.
    ///
    /// dotenvy never overrides variables that are already set, so the first
    /// file loaded wins for any key it defines.
    fn load_dotenv_from_workspace() {
        let mut roots = Vec::new();
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                roots.push(dir.clone());
                if !dir.pop() {
                    break;
                }
            }
        }
        if let Ok(cwd) = std::env::current_dir() {
            roots.push(cwd);
        }

        for root in roots {
            let mut found = false;
            for name in [".env.local", ".env"] {
                let path = root.join(name);
                if path.exists() {
                    let _ = dotenvy::from_path(&path);
                    found = true;
                }
            }
            if found {
                return;
            }
        }
    }
}

fn host_of(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = FerryConfig::default();
        assert!(!config.strapi.is_configured());
        assert!(!config.wordpress.is_configured());
        assert!(!config.sync.dry_run);
    }

    #[test]
    fn fallbacks_fill_urls_from_public_variants() {
        let mut config = FerryConfig::default();
        config.strapi.public_url = "https://cms.example.com/".into();
        config.wordpress.public_url = "https://admin.example.com".into();
        config.apply_fallbacks();
        assert_eq!(config.strapi.url, "https://cms.example.com");
        assert_eq!(config.wordpress.url, "https://admin.example.com");
    }

    #[test]
    fn explicit_url_beats_public_fallback() {
        let mut config = FerryConfig::default();
        config.strapi.url = "http://localhost:1337".into();
        config.strapi.public_url = "https://cms.example.com".into();
        config.apply_fallbacks();
        assert_eq!(config.strapi.url, "http://localhost:1337");
    }

    #[test]
    fn source_hosts_exclude_public_site() {
        let mut config = FerryConfig::default();
        config.strapi.url = "https://cms.example.com".into();
        config.wordpress.url = "https://admin.example.com".into();
        config.site.public_url = "https://www.example.com".into();
        config.site.source_hosts = vec!["www.example.com".into(), "old.example.com".into()];
        assert_eq!(
            config.source_hosts(),
            vec!["cms.example.com", "admin.example.com", "old.example.com"]
        );
    }

    #[test]
    fn asset_base_defaults_to_strapi() {
        let mut config = FerryConfig::default();
        config.strapi.url = "https://cms.example.com".into();
        assert_eq!(config.asset_base(), "https://cms.example.com");
        config.site.asset_url = "https://media.example.com".into();
        assert_eq!(config.asset_base(), "https://media.example.com");
    }

    #[test]
    fn require_reports_missing_fields() {
        let config = FerryConfig::default();
        let err = config.require_wordpress().unwrap_err();
        assert!(err.to_string().contains("url, username, app_password"));
    }
}
