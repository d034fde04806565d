//! Link and asset URL rewriting.
//!
//! Links that point at an admin/source host move to the public site. Assets
//! never do: the public site does not serve uploads, so relative upload paths
//! are anchored to the asset origin and absolute asset URLs stay put.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\bsrc(?:set)?\s*=\s*["']?)?\bhttps?://([a-z0-9.-]+)(:\d+)?([^\s"'<>()\]]*)"#)
        .unwrap()
});

static RELATIVE_UPLOAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)((?:\bsrc|\bhref|\bdata-src)\s*=\s*["']|\]\()(/(?:wp-content/)?uploads/[^\s"'<>()]*)"#)
        .unwrap()
});

const ASSET_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "avif", "svg", "ico", "bmp", "tif", "tiff", "mp4", "webm",
    "mov", "mp3", "wav", "pdf", "zip",
];

/// Where links and assets should point after migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPolicy {
    /// Hosts considered admin/source hosts (lowercase, no port).
    pub source_hosts: Vec<String>,
    /// Public site origin that links are rewritten to, e.g. `https://www.example.com`.
    pub public_base: String,
    /// Origin that hosts uploaded binaries, e.g. `https://cms.example.com`.
    pub asset_base: String,
}

impl UrlPolicy {
    pub fn new(
        source_hosts: impl IntoIterator<Item = impl Into<String>>,
        public_base: impl Into<String>,
        asset_base: impl Into<String>,
    ) -> Self {
        let public_base = public_base.into().trim_end_matches('/').to_string();
        let public_host = host_of(&public_base);
        let source_hosts = source_hosts
            .into_iter()
            .map(|h| h.into().to_ascii_lowercase())
            .filter(|h| !h.is_empty() && Some(h) != public_host.as_ref())
            .collect();
        Self {
            source_hosts,
            public_base,
            asset_base: asset_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// A policy that leaves every URL alone.
    #[must_use]
    pub fn passthrough() -> Self {
        Self::default()
    }

    fn is_source_host(&self, host: &str) -> bool {
        self.source_hosts.iter().any(|h| h.eq_ignore_ascii_case(host))
    }

    /// Apply the policy to every URL in `text` (HTML or Markdown).
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();

        if !self.asset_base.is_empty() && RELATIVE_UPLOAD.is_match(&out) {
            out = RELATIVE_UPLOAD
                .replace_all(&out, |caps: &Captures<'_>| {
                    format!("{}{}{}", &caps[1], self.asset_base, &caps[2])
                })
                .into_owned();
        }

        if !self.public_base.is_empty() && !self.source_hosts.is_empty() {
            out = ABSOLUTE_URL
                .replace_all(&out, |caps: &Captures<'_>| self.rewrite_absolute(caps))
                .into_owned();
        }
        out
    }

    fn rewrite_absolute(&self, caps: &Captures<'_>) -> String {
        let original = caps[0].to_string();
        let in_src_attribute = caps.get(1).is_some();
        let host = &caps[2];
        let rest = caps.get(4).map_or("", |m| m.as_str());

        if in_src_attribute || is_asset_path(rest) || !self.is_source_host(host) {
            return original;
        }
        let path = if rest.is_empty() { "/" } else { rest };
        format!("{}{path}", self.public_base)
    }
}

/// Whether the path of a URL names an uploaded binary.
#[must_use]
pub fn is_asset_path(path_and_query: &str) -> bool {
    let path = path_and_query
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if path.contains("/wp-content/uploads/") || path.starts_with("/uploads/") {
        return true;
    }
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ASSET_EXTENSIONS.contains(&ext))
}

fn host_of(raw: &str) -> Option<String> {
    url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
}
