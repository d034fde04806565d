//! Media resolution: turning a source [`MediaRef`] into a destination
//! attachment ID.
//!
//! Callers only see [`MediaResolver`]. The default implementation matches by
//! filename against the destination media library and uploads what it cannot
//! find; [`MappedMediaResolver`] answers from a fixed URL table instead.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use ferry_cms::WpMedia;
use ferry_core::{MediaId, MediaRef, filename_from_url};

use crate::context::{RunConfig, SyncContext};
use crate::error::SyncError;
use crate::ports::{DestinationCms, SourceCms};
use crate::retry::{RetryPolicy, Sleeper, with_retry};

/// Resolve a media reference to a destination attachment.
///
/// `Ok(None)` means the asset does not exist at the source and the field
/// should be left unset.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    async fn resolve(&self, media: &MediaRef, ctx: &mut SyncContext) -> Result<Option<MediaId>, SyncError>;
}

// ── Heuristic resolver ─────────────────────────────────────────────

/// Search-then-upload resolver.
///
/// Order: existing destination ID, run cache, media-library search by
/// filename stem, then download and upload (or, in a dry run, an existence
/// probe and [`MediaId::Pending`]).
pub struct HeuristicMediaResolver<'a> {
    source: &'a dyn SourceCms,
    destination: &'a dyn DestinationCms,
    sleeper: &'a dyn Sleeper,
    retry: RetryPolicy,
    dry_run: bool,
}

impl<'a> HeuristicMediaResolver<'a> {
    #[must_use]
    pub const fn new(
        source: &'a dyn SourceCms,
        destination: &'a dyn DestinationCms,
        sleeper: &'a dyn Sleeper,
        run: &RunConfig,
    ) -> Self {
        Self {
            source,
            destination,
            sleeper,
            retry: run.retry,
            dry_run: !run.writes_enabled(),
        }
    }

    async fn search(&self, media: &MediaRef) -> Result<Option<u64>, SyncError> {
        let stem = media.stem();
        if stem.is_empty() {
            return Ok(None);
        }
        let hits = with_retry(&self.retry, self.sleeper, "media search", || {
            self.destination.search_media(stem)
        })
        .await?;
        Ok(pick_media_hit(&hits, &media.filename))
    }

    async fn upload(&self, url: &str, filename: &str, ctx: &mut SyncContext) -> Result<Option<MediaId>, SyncError> {
        let asset = with_retry(&self.retry, self.sleeper, "media download", || {
            self.source.fetch_asset(url)
        })
        .await?;
        let Some(asset) = asset else {
            tracing::warn!(url, "source image not found, leaving field unset");
            return Ok(None);
        };

        let content_type = asset
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let filename = with_extension(filename, &content_type);
        let uploaded = with_retry(&self.retry, self.sleeper, "media upload", || {
            self.destination
                .upload_media(&filename, &content_type, asset.bytes.clone())
        })
        .await?;
        ctx.count_write();
        tracing::info!(url, id = uploaded.id, filename = %filename, "uploaded media");
        Ok(Some(MediaId::Remote(uploaded.id)))
    }

    async fn preview(&self, url: &str, filename: &str) -> Result<Option<MediaId>, SyncError> {
        let head = with_retry(&self.retry, self.sleeper, "media probe", || {
            self.source.probe_asset(url)
        })
        .await?;
        match head {
            Some(head) => {
                tracing::info!(
                    url,
                    filename,
                    content_type = head.content_type.as_deref().unwrap_or("unknown"),
                    "dry run: would upload media"
                );
                Ok(Some(MediaId::Pending))
            }
            None => {
                tracing::warn!(url, "source image not found, leaving field unset");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl MediaResolver for HeuristicMediaResolver<'_> {
    async fn resolve(&self, media: &MediaRef, ctx: &mut SyncContext) -> Result<Option<MediaId>, SyncError> {
        if let Some(id) = media.destination_id {
            return Ok(Some(id));
        }
        let url = media.source_url.trim();
        if url.is_empty() {
            return Ok(None);
        }
        if let Some(cached) = ctx.cached_media(url) {
            return Ok(cached);
        }

        let media = media.named();
        let resolved = if let Some(id) = self.search(&media).await? {
            tracing::debug!(url, id, "media already in library");
            Some(MediaId::Remote(id))
        } else if self.dry_run {
            self.preview(url, &media.filename).await?
        } else {
            self.upload(url, &media.filename, ctx).await?
        };
        ctx.cache_media(url, resolved);
        Ok(resolved)
    }
}

/// Prefer a hit whose URL ends in exactly `/<filename>`; otherwise accept the
/// first hit.
fn pick_media_hit(hits: &[WpMedia], filename: &str) -> Option<u64> {
    let suffix = format!("/{filename}");
    hits.iter()
        .find(|hit| hit.source_url.ends_with(&suffix))
        .or_else(|| hits.first())
        .map(|hit| hit.id)
}

/// Extension for a declared content type.
#[must_use]
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

/// `filename` as-is when it has an extension, else with one inferred from
/// the content type.
fn with_extension(filename: &str, content_type: &str) -> String {
    let has_extension = filename
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty());
    if has_extension {
        filename.to_string()
    } else {
        let stem = if filename.is_empty() { "media" } else { filename };
        format!("{stem}.{}", extension_for(content_type))
    }
}

// ── Mapped resolver ────────────────────────────────────────────────

/// Resolver backed by a fixed source URL → attachment ID table.
#[derive(Debug, Clone, Default)]
pub struct MappedMediaResolver {
    by_url: HashMap<String, u64>,
    by_filename: HashMap<String, u64>,
}

impl MappedMediaResolver {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, u64)>) -> Self {
        let mut resolver = Self::default();
        for (url, id) in entries {
            let filename = filename_from_url(&url);
            if !filename.is_empty() {
                resolver.by_filename.entry(filename).or_insert(id);
            }
            resolver.by_url.insert(url, id);
        }
        resolver
    }

    /// Load a JSON object of `{ "<source url>": <attachment id> }`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MediaMap`] if the file cannot be read or is not
    /// such an object.
    pub fn from_path(path: &Path) -> Result<Self, SyncError> {
        let map_error = |reason: String| SyncError::MediaMap {
            path: path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| map_error(e.to_string()))?;
        let entries: HashMap<String, u64> =
            serde_json::from_str(&raw).map_err(|e| map_error(e.to_string()))?;
        tracing::info!(path = %path.display(), entries = entries.len(), "loaded media map");
        Ok(Self::from_entries(entries))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

#[async_trait]
impl MediaResolver for MappedMediaResolver {
    async fn resolve(&self, media: &MediaRef, _ctx: &mut SyncContext) -> Result<Option<MediaId>, SyncError> {
        if let Some(id) = media.destination_id {
            return Ok(Some(id));
        }
        let found = self
            .by_url
            .get(media.source_url.trim())
            .or_else(|| self.by_filename.get(&media.named().filename));
        if found.is_none() && !media.source_url.is_empty() {
            tracing::warn!(url = %media.source_url, "no media map entry");
        }
        Ok(found.copied().map(MediaId::Remote))
    }
}
