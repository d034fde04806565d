use ferry_config::FerryConfig;

/// Warn about `FERRY_*` variables that look like section settings but were
/// ignored, usually because of a single underscore separator.
pub fn warn_unconfigured(config: &FerryConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &FerryConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let sections = [
        ("Strapi", "FERRY_STRAPI", "FERRY_STRAPI__API_TOKEN", config.strapi.is_configured()),
        (
            "WordPress",
            "FERRY_WORDPRESS",
            "FERRY_WORDPRESS__APP_PASSWORD",
            config.wordpress.is_configured(),
        ),
    ];

    sections
        .into_iter()
        .filter(|(_, prefix, _, configured)| !configured && has_single_underscore_key(&keys, prefix))
        .map(|(name, prefix, example, _)| {
            format!("{name} config appears unset while {prefix}_* env vars exist. Use double underscores (example: {example}).")
        })
        .collect()
}

fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter()
        .filter_map(|key| key.strip_prefix(prefix))
        .any(|rest| rest.starts_with('_') && !rest.starts_with("__"))
}
