//! WordPress (destination CMS) configuration.

use serde::{Deserialize, Serialize};

const fn default_per_page() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WordPressConfig {
    /// Base URL of the WordPress admin/API host (e.g., `https://admin.example.com`).
    #[serde(default)]
    pub url: String,

    /// Username for HTTP Basic authentication.
    #[serde(default)]
    pub username: String,

    /// Application password for HTTP Basic authentication. WordPress displays
    /// these in space-separated groups; both the raw and the whitespace-stripped
    /// form are tried.
    #[serde(default)]
    pub app_password: String,

    /// Publicly reachable URL of the WordPress host. Used when `url` is unset.
    #[serde(default)]
    pub public_url: String,

    /// `per_page` for REST listing (WordPress caps this at 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for WordPressConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            app_password: String::new(),
            public_url: String::new(),
            per_page: default_per_page(),
        }
    }
}

impl WordPressConfig {
    /// Check if the WordPress config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.username.is_empty() && !self.app_password.is_empty()
    }

    /// Names of required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.url.is_empty() {
            missing.push("url");
        }
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.app_password.is_empty() {
            missing.push("app_password");
        }
        missing
    }

    /// REST API root, e.g. `https://admin.example.com/wp-json/wp/v2`.
    pub fn rest_root(&self) -> String {
        format!("{}/wp-json/wp/v2", self.url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = WordPressConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.per_page, 100);
    }

    #[test]
    fn rest_root_joins_without_double_slash() {
        let config = WordPressConfig {
            url: "https://admin.example.com/".into(),
            ..Default::default()
        };
        assert_eq!(config.rest_root(), "https://admin.example.com/wp-json/wp/v2");
    }

    #[test]
    fn missing_fields_lists_only_empty() {
        let config = WordPressConfig {
            url: "https://admin.example.com".into(),
            username: "editor".into(),
            ..Default::default()
        };
        assert_eq!(config.missing_fields(), vec!["app_password"]);
    }
}
