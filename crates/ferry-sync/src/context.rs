//! Run flags and per-run state.
//!
//! [`RunConfig`] carries the flags of one command invocation and is handed to
//! every pass explicitly. [`SyncContext`] holds the caches built up while the
//! run progresses; a fresh one is created per run.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use ferry_config::SyncConfig;
use ferry_core::{ContentKind, DestinationRecord, MediaId};
use ferry_normalize::{group_by_base, pick_survivor, strip_suffix};
use ferry_sanitize::TextFormat;

use crate::error::SyncError;
use crate::retry::RetryPolicy;

/// Which content kinds a command touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    All,
    WorksOnly,
    InsightsOnly,
}

impl Scope {
    /// Build from the `--works-only` / `--insights-only` flags. Both set
    /// means both kinds.
    #[must_use]
    pub const fn from_flags(works_only: bool, insights_only: bool) -> Self {
        match (works_only, insights_only) {
            (true, false) => Self::WorksOnly,
            (false, true) => Self::InsightsOnly,
            _ => Self::All,
        }
    }

    #[must_use]
    pub const fn kinds(self) -> &'static [ContentKind] {
        match self {
            Self::All => &ContentKind::ALL,
            Self::WorksOnly => &[ContentKind::Work],
            Self::InsightsOnly => &[ContentKind::Insight],
        }
    }
}

/// Flags of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Simulate writes.
    pub dry_run: bool,
    /// `--yes` was given.
    pub confirmed: bool,
    /// Update records that already exist at the destination instead of
    /// skipping them.
    pub update_existing: bool,
    pub scope: Scope,
    pub retry: RetryPolicy,
    /// Pause between consecutive destination writes.
    pub write_delay: Duration,
    /// Representation rich text is written in.
    pub text_format: TextFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            confirmed: false,
            update_existing: false,
            scope: Scope::All,
            retry: RetryPolicy::default(),
            write_delay: Duration::ZERO,
            text_format: TextFormat::Markdown,
        }
    }
}

impl RunConfig {
    /// Apply the write gate.
    ///
    /// With `--yes` the run writes unless a dry run was requested (flag or
    /// `sync.dry_run`). Without `--yes` a requested dry run proceeds as one;
    /// anything else is refused.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotConfirmed`] when neither `--yes` nor a dry run
    /// was requested.
    pub fn gate(confirmed: bool, dry_run_flag: bool, config: &SyncConfig) -> Result<Self, SyncError> {
        let dry_run = dry_run_flag || config.dry_run;
        if !confirmed && !dry_run {
            return Err(SyncError::NotConfirmed);
        }
        Ok(Self {
            dry_run,
            confirmed,
            update_existing: false,
            scope: Scope::All,
            retry: RetryPolicy::from_config(config),
            write_delay: Duration::from_millis(config.write_delay_ms),
            text_format: TextFormat::Markdown,
        })
    }

    #[must_use]
    pub const fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub const fn with_update_existing(mut self, update: bool) -> Self {
        self.update_existing = update;
        self
    }

    #[must_use]
    pub const fn with_text_format(mut self, format: TextFormat) -> Self {
        self.text_format = format;
        self
    }

    /// Whether write endpoints may be called.
    #[must_use]
    pub const fn writes_enabled(&self) -> bool {
        self.confirmed && !self.dry_run
    }
}

/// The destination record that owns a base slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugOwner {
    /// `None` for a record that a dry run would have created.
    pub id: Option<u64>,
    pub slug: String,
}

/// Caches and counters for one run.
#[derive(Debug, Default)]
pub struct SyncContext {
    media: HashMap<String, Option<MediaId>>,
    tags: HashMap<String, u64>,
    slugs: HashMap<ContentKind, BTreeMap<String, SlugOwner>>,
    writes: u32,
}

impl SyncContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached resolution of a source media URL. The outer `None` means the
    /// URL has not been seen; `Some(None)` means it is known to be missing.
    #[must_use]
    pub fn cached_media(&self, url: &str) -> Option<Option<MediaId>> {
        self.media.get(url).copied()
    }

    pub fn cache_media(&mut self, url: impl Into<String>, id: Option<MediaId>) {
        self.media.insert(url.into(), id);
    }

    #[must_use]
    pub fn cached_tag(&self, slug: &str) -> Option<u64> {
        self.tags.get(slug).copied()
    }

    pub fn cache_tag(&mut self, slug: impl Into<String>, id: u64) {
        self.tags.insert(slug.into(), id);
    }

    /// Index destination records of `kind` by base slug, keeping the
    /// survivor of each group.
    pub fn index_destination(&mut self, kind: ContentKind, records: Vec<DestinationRecord>) {
        let index = group_by_base(records)
            .into_iter()
            .filter_map(|(base, group)| {
                pick_survivor(&group).map(|survivor| {
                    (
                        base,
                        SlugOwner {
                            id: Some(survivor.id),
                            slug: survivor.slug.clone(),
                        },
                    )
                })
            })
            .collect();
        self.slugs.insert(kind, index);
    }

    /// Owner of the base slug of `slug`, if any.
    #[must_use]
    pub fn slug_owner(&self, kind: ContentKind, slug: &str) -> Option<&SlugOwner> {
        self.slugs.get(&kind)?.get(strip_suffix(slug))
    }

    /// Record that `slug` now exists (or would exist, with `id = None`).
    pub fn claim_slug(&mut self, kind: ContentKind, slug: &str, id: Option<u64>) {
        self.slugs.entry(kind).or_default().insert(
            strip_suffix(slug).to_string(),
            SlugOwner {
                id,
                slug: slug.to_string(),
            },
        );
    }

    /// Destination writes performed so far (records, uploads, terms).
    #[must_use]
    pub const fn writes(&self) -> u32 {
        self.writes
    }

    pub const fn count_write(&mut self) {
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::ContentItem;

    fn record(id: u64, slug: &str) -> DestinationRecord {
        DestinationRecord {
            id,
            slug: slug.into(),
            date: None,
            item: ContentItem::new(ContentKind::Work, slug, slug),
        }
    }

    #[test]
    fn gate_refuses_unconfirmed_writes() {
        let config = SyncConfig::default();
        assert!(matches!(
            RunConfig::gate(false, false, &config),
            Err(SyncError::NotConfirmed)
        ));
        let preview = RunConfig::gate(false, true, &config).unwrap();
        assert!(preview.dry_run);
        assert!(!preview.writes_enabled());
        let write = RunConfig::gate(true, false, &config).unwrap();
        assert!(write.writes_enabled());
    }

    #[test]
    fn configured_dry_run_satisfies_the_gate() {
        let config = SyncConfig {
            dry_run: true,
            ..SyncConfig::default()
        };
        let run = RunConfig::gate(true, false, &config).unwrap();
        assert!(run.dry_run);
        assert!(!run.writes_enabled());
    }

    #[test]
    fn scope_from_flags() {
        assert_eq!(Scope::from_flags(true, false).kinds(), &[ContentKind::Work]);
        assert_eq!(Scope::from_flags(false, true).kinds(), &[ContentKind::Insight]);
        assert_eq!(Scope::from_flags(true, true).kinds().len(), 2);
    }

    #[test]
    fn index_keeps_the_survivor() {
        let mut ctx = SyncContext::new();
        ctx.index_destination(
            ContentKind::Work,
            vec![record(7, "harbor-2"), record(3, "harbor"), record(9, "quiet-rooms")],
        );
        let owner = ctx.slug_owner(ContentKind::Work, "harbor-4").unwrap();
        assert_eq!(owner.id, Some(3));
        assert!(ctx.slug_owner(ContentKind::Insight, "harbor").is_none());

        ctx.claim_slug(ContentKind::Work, "lantern", None);
        assert_eq!(ctx.slug_owner(ContentKind::Work, "lantern").unwrap().id, None);
    }

    #[test]
    fn media_cache_remembers_misses() {
        let mut ctx = SyncContext::new();
        assert_eq!(ctx.cached_media("https://cms/a.jpg"), None);
        ctx.cache_media("https://cms/a.jpg", None);
        assert_eq!(ctx.cached_media("https://cms/a.jpg"), Some(None));
        ctx.cache_media("https://cms/b.jpg", Some(MediaId::Remote(4)));
        assert_eq!(ctx.cached_media("https://cms/b.jpg"), Some(Some(MediaId::Remote(4))));
    }
}
