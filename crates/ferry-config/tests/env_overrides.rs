//! Environment variable precedence tests.
//!
//! Uses `figment::Jail` for sandboxed env var and working-directory changes.

use figment::Jail;
use ferry_config::FerryConfig;

#[test]
fn prefixed_env_fills_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("FERRY_STRAPI__URL", "https://cms.example.com");
        jail.set_env("FERRY_STRAPI__API_TOKEN", "bootstrap-token");
        jail.set_env("FERRY_SYNC__MAX_ATTEMPTS", "5");

        let config = FerryConfig::load().expect("config loads");
        assert_eq!(config.strapi.url, "https://cms.example.com");
        assert_eq!(config.strapi.api_token, "bootstrap-token");
        assert_eq!(config.sync.max_attempts, 5);
        assert!(config.strapi.is_configured());
        Ok(())
    });
}

#[test]
fn legacy_script_variables_are_understood() {
    Jail::expect_with(|jail| {
        jail.set_env("WP_URL", "https://admin.example.com");
        jail.set_env("WP_USERNAME", "editor");
        jail.set_env("WP_APP_PASSWORD", "abcd efgh ijkl");
        jail.set_env("DRY_RUN", "true");

        let config = FerryConfig::load().expect("config loads");
        assert_eq!(config.wordpress.url, "https://admin.example.com");
        assert_eq!(config.wordpress.username, "editor");
        assert_eq!(config.wordpress.app_password, "abcd efgh ijkl");
        assert!(config.sync.dry_run);
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_legacy_names() {
    Jail::expect_with(|jail| {
        jail.set_env("STRAPI_URL", "https://legacy.example.com");
        jail.set_env("FERRY_STRAPI__URL", "https://cms.example.com");

        let config = FerryConfig::load().expect("config loads");
        assert_eq!(config.strapi.url, "https://cms.example.com");
        Ok(())
    });
}

#[test]
fn public_url_fallback_applies_after_env() {
    Jail::expect_with(|jail| {
        jail.set_env("PUBLIC_STRAPI_URL", "https://cms.example.com/");

        let config = FerryConfig::load().expect("config loads");
        assert_eq!(config.strapi.url, "https://cms.example.com");
        Ok(())
    });
}

#[test]
fn explicit_env_file_is_loaded() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "sync.env",
            "FERRY_SITE__ASSET_URL=https://media.example.com\nFERRY_STRAPI__PAGE_SIZE=10\n",
        )?;
        let path = jail.directory().join("sync.env");

        let config = FerryConfig::load_with_dotenv(Some(&path)).expect("config loads");
        assert_eq!(config.site.asset_url, "https://media.example.com");
        assert_eq!(config.strapi.page_size, 10);
        Ok(())
    });
}

#[test]
fn missing_explicit_env_file_is_an_error() {
    Jail::expect_with(|jail| {
        let path = jail.directory().join("absent.env");
        let result = FerryConfig::load_with_dotenv(Some(&path));
        assert!(result.is_err());
        Ok(())
    });
}
