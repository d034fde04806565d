//! The sync passes: `sync`, `dedupe`, `fix-content` and `repair-media`.
//!
//! Every pass is sequential. Network reads and writes go through
//! [`with_retry`]; per-item failures are counted and the pass moves on,
//! while fatal errors (rejected credentials) abort it.

use std::collections::HashMap;

use ferry_core::{ContentItem, ContentKind, DestinationRecord, ItemAction, MediaRef, SyncResult};
use ferry_normalize::{NormalizeOptions, group_by_base, normalize_all, normalize_destination, pick_survivor, strip_suffix};
use ferry_sanitize::{SanitizeOptions, UrlPolicy, sanitize};
use serde::Serialize;
use serde_json::Value;

use crate::context::{RunConfig, SyncContext};
use crate::error::SyncError;
use crate::media::MediaResolver;
use crate::payload::{build_payload, build_update_payload, media_patch, rich_text_patch};
use crate::ports::{DestinationCms, SourceCms};
use crate::retry::{Sleeper, with_retry};
use crate::tags::resolve_tags;

// ── Reports ────────────────────────────────────────────────────────

/// A destination record named by ID and slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRef {
    pub id: u64,
    pub slug: String,
}

impl From<&DestinationRecord> for RecordRef {
    fn from(record: &DestinationRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug.clone(),
        }
    }
}

/// Records sharing one base slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub base: String,
    pub keep: RecordRef,
    pub remove: Vec<RecordRef>,
}

/// Outcome of a dedupe pass over one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupeReport {
    pub groups: Vec<DuplicateGroup>,
    pub trashed: u32,
    pub failed: u32,
    pub simulated: bool,
}

impl DedupeReport {
    #[must_use]
    pub fn planned(&self) -> usize {
        self.groups.iter().map(|g| g.remove.len()).sum()
    }
}

// ── Driver ─────────────────────────────────────────────────────────

/// Runs passes against one source and one destination.
pub struct SyncDriver<'a> {
    source: &'a dyn SourceCms,
    destination: &'a dyn DestinationCms,
    media: &'a dyn MediaResolver,
    sleeper: &'a dyn Sleeper,
    run: RunConfig,
    sanitizer: SanitizeOptions,
}

impl<'a> SyncDriver<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn SourceCms,
        destination: &'a dyn DestinationCms,
        media: &'a dyn MediaResolver,
        sleeper: &'a dyn Sleeper,
        run: RunConfig,
    ) -> Self {
        let sanitizer = SanitizeOptions {
            target: run.text_format,
            urls: UrlPolicy::passthrough(),
        };
        Self {
            source,
            destination,
            media,
            sleeper,
            run,
            sanitizer,
        }
    }

    /// Rewrite links and asset URLs in rich text according to `urls`.
    #[must_use]
    pub fn with_url_policy(mut self, urls: UrlPolicy) -> Self {
        self.sanitizer.urls = urls;
        self
    }

    #[must_use]
    pub const fn run(&self) -> &RunConfig {
        &self.run
    }

    fn empty_result(&self) -> SyncResult {
        if self.run.writes_enabled() {
            SyncResult::default()
        } else {
            SyncResult::simulated()
        }
    }

    // ── Reads ──────────────────────────────────────────────────────

    async fn fetch_source(&self, kind: ContentKind) -> Result<Vec<ContentItem>, SyncError> {
        let raw = with_retry(&self.run.retry, self.sleeper, "source fetch", || {
            self.source.fetch_collection(kind)
        })
        .await?;
        let mut options = NormalizeOptions::new(kind);
        if let Some(base) = self.source.media_base() {
            options = options.with_media_base(base);
        }
        let items = normalize_all(&raw, options);
        tracing::info!(%kind, fetched = raw.len(), usable = items.len(), "source items");
        Ok(items)
    }

    async fn fetch_destination(&self, kind: ContentKind) -> Result<Vec<DestinationRecord>, SyncError> {
        let raw = with_retry(&self.run.retry, self.sleeper, "destination list", || {
            self.destination.list(kind)
        })
        .await?;
        Ok(raw.iter().filter_map(|value| normalize_destination(value, kind)).collect())
    }

    // ── Item preparation ───────────────────────────────────────────

    fn sanitize_item(&self, item: &mut ContentItem) {
        for (_, field) in item.rich_text_fields_mut() {
            if let Some(text) = field.as_deref() {
                let cleaned = sanitize(text, &self.sanitizer);
                *field = (!cleaned.trim().is_empty()).then_some(cleaned);
            }
        }
    }

    async fn resolve_one(&self, mut media: MediaRef, ctx: &mut SyncContext) -> Result<Option<MediaRef>, SyncError> {
        Ok(self.media.resolve(&media, ctx).await?.map(|id| {
            media.destination_id = Some(id);
            media
        }))
    }

    /// Resolve every media field; fields whose source asset is gone are
    /// cleared.
    async fn resolve_item_media(&self, item: &mut ContentItem, ctx: &mut SyncContext) -> Result<(), SyncError> {
        for (_, field) in item.media_fields_mut() {
            if let Some(media) = field.take() {
                *field = self.resolve_one(media, ctx).await?;
            }
        }
        let gallery = std::mem::take(&mut item.gallery);
        for media in gallery {
            if let Some(resolved) = self.resolve_one(media, ctx).await? {
                item.gallery.push(resolved);
            }
        }
        Ok(())
    }

    /// Sanitized, media-resolved copy of `item` plus its tag IDs.
    async fn prepare(&self, item: &ContentItem, ctx: &mut SyncContext) -> Result<(ContentItem, Vec<u64>), SyncError> {
        let mut prepared = item.clone();
        self.sanitize_item(&mut prepared);
        self.resolve_item_media(&mut prepared, ctx).await?;
        let tags = resolve_tags(&prepared.tags, self.destination, self.sleeper, &self.run, ctx).await?;
        Ok((prepared, tags))
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Wait out the write delay unless this is the first write of the run.
    async fn pace(&self, ctx: &SyncContext) {
        if ctx.writes() > 0 && !self.run.write_delay.is_zero() {
            self.sleeper.sleep(self.run.write_delay).await;
        }
    }

    /// Create a record. Retries first look the slug up, so a create that
    /// landed before its response was lost is not repeated.
    async fn create_record(&self, kind: ContentKind, slug: &str, payload: &Value) -> Result<Value, SyncError> {
        let mut attempt = 0u32;
        let created = with_retry(&self.run.retry, self.sleeper, "create", || {
            attempt += 1;
            let check_first = attempt > 1;
            async move {
                if check_first
                    && let Some(existing) = self.destination.find_by_slug(kind, slug).await?.into_iter().next()
                {
                    tracing::info!(%kind, slug, "create already landed");
                    return Ok(existing);
                }
                self.destination.create(kind, payload).await
            }
        })
        .await?;
        Ok(created)
    }

    async fn update_record(&self, kind: ContentKind, id: u64, payload: &Value) -> Result<(), SyncError> {
        with_retry(&self.run.retry, self.sleeper, "update", || {
            self.destination.update(kind, id, payload)
        })
        .await?;
        Ok(())
    }

    // ── sync ───────────────────────────────────────────────────────

    /// Sync every kind in scope.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error or failed collection read.
    pub async fn sync(&self, ctx: &mut SyncContext) -> Result<Vec<(ContentKind, SyncResult)>, SyncError> {
        let mut results = Vec::new();
        for &kind in self.run.scope.kinds() {
            results.push((kind, self.sync_kind(kind, ctx).await?));
        }
        Ok(results)
    }

    /// Copy every source item of `kind` to the destination.
    ///
    /// # Errors
    ///
    /// Returns an error when either collection cannot be read or a fatal
    /// error occurs. Per-item failures are counted instead.
    pub async fn sync_kind(&self, kind: ContentKind, ctx: &mut SyncContext) -> Result<SyncResult, SyncError> {
        let items = self.fetch_source(kind).await?;
        let existing = self.fetch_destination(kind).await?;
        tracing::info!(%kind, existing = existing.len(), "destination records");
        ctx.index_destination(kind, existing);

        let mut result = self.empty_result();
        for item in &items {
            match self.sync_item(item, ctx).await {
                Ok(action) => result.record(action),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(%kind, slug = %item.slug, error = %err, "item failed");
                    result.record_failure();
                }
            }
        }
        Ok(result)
    }

    async fn sync_item(&self, item: &ContentItem, ctx: &mut SyncContext) -> Result<ItemAction, SyncError> {
        let kind = item.kind;
        if item.slug.trim().is_empty() {
            return Err(SyncError::MissingIdentifier {
                kind: kind.to_string(),
                name: item.name.clone(),
            });
        }

        let target = match ctx.slug_owner(kind, &item.slug) {
            Some(owner) if !self.run.update_existing => {
                tracing::debug!(%kind, slug = %item.slug, existing = %owner.slug, "already at destination");
                return Ok(ItemAction::Skip);
            }
            Some(owner) => match owner.id {
                Some(id) => Some(id),
                None => return Ok(ItemAction::Skip),
            },
            None => None,
        };

        let (prepared, tag_ids) = self.prepare(item, ctx).await?;

        match target {
            Some(id) => {
                if !self.run.writes_enabled() {
                    tracing::info!(%kind, slug = %item.slug, id, "dry run: would update");
                    return Ok(ItemAction::Update);
                }
                self.pace(ctx).await;
                self.update_record(kind, id, &build_update_payload(&prepared, &tag_ids))
                    .await?;
                ctx.count_write();
                tracing::info!(%kind, slug = %item.slug, id, "updated");
                Ok(ItemAction::Update)
            }
            None => {
                if !self.run.writes_enabled() {
                    tracing::info!(%kind, slug = %item.slug, "dry run: would create");
                    ctx.claim_slug(kind, &item.slug, None);
                    return Ok(ItemAction::Create);
                }
                self.pace(ctx).await;
                let created = self
                    .create_record(kind, &prepared.slug, &build_payload(&prepared, &tag_ids))
                    .await?;
                ctx.count_write();
                let id = created.get("id").and_then(Value::as_u64);
                ctx.claim_slug(kind, &item.slug, id);
                tracing::info!(%kind, slug = %item.slug, id = id.unwrap_or_default(), "created");
                Ok(ItemAction::Create)
            }
        }
    }

    // ── dedupe ─────────────────────────────────────────────────────

    /// Group destination records by base slug and trash every record but the
    /// survivor of each group.
    ///
    /// # Errors
    ///
    /// Returns an error when the destination cannot be listed or a fatal
    /// error occurs.
    pub async fn dedupe_kind(&self, kind: ContentKind, ctx: &mut SyncContext) -> Result<DedupeReport, SyncError> {
        let records = self.fetch_destination(kind).await?;
        let mut report = DedupeReport {
            simulated: !self.run.writes_enabled(),
            ..DedupeReport::default()
        };

        for (base, group) in group_by_base(records) {
            if group.len() < 2 {
                continue;
            }
            let Some(survivor) = pick_survivor(&group) else {
                continue;
            };
            let keep = RecordRef::from(survivor);
            let remove: Vec<RecordRef> = group
                .iter()
                .filter(|record| record.id != keep.id)
                .map(RecordRef::from)
                .collect();
            tracing::info!(%kind, base = %base, keep = %keep.slug, remove = remove.len(), "duplicate group");
            report.groups.push(DuplicateGroup { base, keep, remove });
        }

        if report.simulated {
            for group in &report.groups {
                for record in &group.remove {
                    tracing::info!(%kind, id = record.id, slug = %record.slug, "dry run: would trash");
                }
            }
            return Ok(report);
        }

        let doomed: Vec<RecordRef> = report.groups.iter().flat_map(|g| g.remove.clone()).collect();
        for record in doomed {
            self.pace(ctx).await;
            let trashed = with_retry(&self.run.retry, self.sleeper, "trash", || {
                self.destination.trash(kind, record.id)
            })
            .await;
            match trashed.map_err(SyncError::from) {
                Ok(()) => {
                    ctx.count_write();
                    report.trashed += 1;
                    tracing::info!(%kind, id = record.id, slug = %record.slug, "trashed duplicate");
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(%kind, id = record.id, error = %err, "trash failed");
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }

    // ── fix-content ────────────────────────────────────────────────

    /// Re-sanitize destination rich text in place, updating only records
    /// whose content changes.
    ///
    /// # Errors
    ///
    /// Returns an error when the destination cannot be listed or a fatal
    /// error occurs.
    pub async fn fix_content_kind(&self, kind: ContentKind, ctx: &mut SyncContext) -> Result<SyncResult, SyncError> {
        let records = self.fetch_destination(kind).await?;
        let mut result = self.empty_result();
        for record in &records {
            let mut cleaned = record.item.clone();
            self.sanitize_item(&mut cleaned);
            let Some(patch) = rich_text_patch(&record.item, &cleaned) else {
                result.record(ItemAction::Skip);
                continue;
            };
            if !self.run.writes_enabled() {
                tracing::info!(%kind, id = record.id, slug = %record.slug, "dry run: would rewrite content");
                result.record(ItemAction::Update);
                continue;
            }
            self.pace(ctx).await;
            match self.update_record(kind, record.id, &patch).await {
                Ok(()) => {
                    ctx.count_write();
                    tracing::info!(%kind, id = record.id, slug = %record.slug, "rewrote content");
                    result.record(ItemAction::Update);
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(%kind, id = record.id, error = %err, "content update failed");
                    result.record_failure();
                }
            }
        }
        Ok(result)
    }

    // ── repair-media ───────────────────────────────────────────────

    /// Attach media to destination records that lack a main image while
    /// their source item has one.
    ///
    /// # Errors
    ///
    /// Returns an error when either collection cannot be read or a fatal
    /// error occurs.
    pub async fn repair_media_kind(&self, kind: ContentKind, ctx: &mut SyncContext) -> Result<SyncResult, SyncError> {
        let mut sources: HashMap<String, ContentItem> = HashMap::new();
        for item in self.fetch_source(kind).await? {
            sources.entry(strip_suffix(&item.slug).to_string()).or_insert(item);
        }
        let records = self.fetch_destination(kind).await?;

        let mut result = self.empty_result();
        for record in &records {
            let source = sources.get(strip_suffix(&record.slug));
            match self.repair_record(record, source, ctx).await {
                Ok(action) => result.record(action),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(%kind, id = record.id, error = %err, "media repair failed");
                    result.record_failure();
                }
            }
        }
        Ok(result)
    }

    async fn repair_record(
        &self,
        record: &DestinationRecord,
        source: Option<&ContentItem>,
        ctx: &mut SyncContext,
    ) -> Result<ItemAction, SyncError> {
        let kind = record.item.kind;
        let current = &record.item;
        if current.main_image.is_some() {
            return Ok(ItemAction::Skip);
        }
        let Some(source) = source.filter(|s| s.main_image.is_some()) else {
            return Ok(ItemAction::Skip);
        };

        let mut repair = ContentItem::new(kind, current.name.clone(), record.slug.clone());
        repair.main_image = source.main_image.clone();
        if current.cover_image.is_none() {
            repair.cover_image = source.cover_image.clone();
        }
        if current.client_logo.is_none() {
            repair.client_logo = source.client_logo.clone();
        }
        if current.thumbnail_image.is_none() {
            repair.thumbnail_image = source.thumbnail_image.clone();
        }
        if current.gallery.is_empty() {
            repair.gallery = source.gallery.clone();
        }
        self.resolve_item_media(&mut repair, ctx).await?;

        if repair.main_image.is_none() {
            tracing::warn!(%kind, slug = %record.slug, "source main image unavailable");
            return Ok(ItemAction::Skip);
        }
        if !self.run.writes_enabled() {
            tracing::info!(%kind, id = record.id, slug = %record.slug, "dry run: would attach media");
            return Ok(ItemAction::Update);
        }
        let Some(patch) = media_patch(&repair) else {
            return Ok(ItemAction::Skip);
        };
        self.pace(ctx).await;
        self.update_record(kind, record.id, &patch).await?;
        ctx.count_write();
        tracing::info!(%kind, id = record.id, slug = %record.slug, "attached media");
        Ok(ItemAction::Update)
    }
}
