//! In-memory CMS fakes shared by the sync integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ferry_cms::{Asset, AssetHead, CmsError, WpMedia, WpTerm, WpUser};
use ferry_core::ContentKind;
use ferry_sync::{DestinationCms, Sleeper, SourceCms};
use serde_json::{Value, json};

pub const STRAPI_BASE: &str = "http://strapi.test";

/// A Strapi v4 record (`{id, attributes}`).
pub fn strapi_record(id: u64, name: &str, slug: &str, extra: Value) -> Value {
    let mut attributes = json!({
        "name": name,
        "slug": slug,
        "publishedAt": "2024-02-01T10:00:00.000Z",
    });
    if let (Some(target), Value::Object(extra)) = (attributes.as_object_mut(), extra) {
        target.extend(extra);
    }
    json!({ "id": id, "attributes": attributes })
}

/// A WordPress record as returned in edit context.
pub fn wp_record(id: u64, slug: &str, extra: Value) -> Value {
    let mut record = json!({
        "id": id,
        "slug": slug,
        "status": "publish",
        "title": { "raw": slug, "rendered": slug },
    });
    if let (Some(target), Value::Object(extra)) = (record.as_object_mut(), extra) {
        target.extend(extra);
    }
    record
}

// ── Source ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSource {
    pub collections: HashMap<ContentKind, Vec<Value>>,
    pub assets: HashMap<String, Asset>,
    pub downloads: Mutex<Vec<String>>,
    pub probes: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with(kind: ContentKind, records: Vec<Value>) -> Self {
        let mut source = Self::default();
        source.collections.insert(kind, records);
        source
    }

    pub fn asset(mut self, path: &str, content_type: &str) -> Self {
        self.assets.insert(
            format!("{STRAPI_BASE}{path}"),
            Asset {
                bytes: vec![0xFF, 0xD8, 0xFF],
                content_type: Some(content_type.to_string()),
            },
        );
        self
    }
}

#[async_trait]
impl SourceCms for FakeSource {
    async fn fetch_collection(&self, kind: ContentKind) -> Result<Vec<Value>, CmsError> {
        Ok(self.collections.get(&kind).cloned().unwrap_or_default())
    }

    async fn fetch_asset(&self, url: &str) -> Result<Option<Asset>, CmsError> {
        self.downloads.lock().unwrap().push(url.to_string());
        Ok(self.assets.get(url).cloned())
    }

    async fn probe_asset(&self, url: &str) -> Result<Option<AssetHead>, CmsError> {
        self.probes.lock().unwrap().push(url.to_string());
        Ok(self.assets.get(url).map(|asset| AssetHead {
            content_type: asset.content_type.clone(),
        }))
    }

    fn media_base(&self) -> Option<&str> {
        Some(STRAPI_BASE)
    }
}

// ── Destination ────────────────────────────────────────────────────

/// Records every write as a short line (`create works lantern`,
/// `update works 5`, `trash works 7`, `upload lantern.jpg`, `tag Branding`).
pub struct FakeDestination {
    pub records: Mutex<HashMap<ContentKind, Vec<Value>>>,
    pub media: Vec<WpMedia>,
    pub tags: Mutex<Vec<WpTerm>>,
    pub writes: Mutex<Vec<String>>,
    pub payloads: Mutex<Vec<Value>>,
    /// Slugs whose creation always fails with a 503.
    pub failing_slugs: HashSet<String>,
    /// Answer every write with a 401.
    pub reject_writes: bool,
    pub next_id: AtomicU64,
}

impl Default for FakeDestination {
    fn default() -> Self {
        Self {
            records: Mutex::default(),
            media: Vec::new(),
            tags: Mutex::default(),
            writes: Mutex::default(),
            payloads: Mutex::default(),
            failing_slugs: HashSet::new(),
            reject_writes: false,
            next_id: AtomicU64::new(100),
        }
    }
}

impl FakeDestination {
    pub fn with(kind: ContentKind, records: Vec<Value>) -> Self {
        let destination = Self::default();
        destination.records.lock().unwrap().insert(kind, records);
        destination
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.payloads.lock().unwrap().clone()
    }

    fn write(&self, line: String) -> Result<(), CmsError> {
        if self.reject_writes {
            return Err(CmsError::Unauthorized { system: "WordPress" });
        }
        self.writes.lock().unwrap().push(line);
        Ok(())
    }
}

#[async_trait]
impl DestinationCms for FakeDestination {
    async fn list(&self, kind: ContentKind) -> Result<Vec<Value>, CmsError> {
        Ok(self.records.lock().unwrap().get(&kind).cloned().unwrap_or_default())
    }

    async fn find_by_slug(&self, kind: ContentKind, slug: &str) -> Result<Vec<Value>, CmsError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&kind)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r["slug"] == slug)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(&self, kind: ContentKind, payload: &Value) -> Result<Value, CmsError> {
        let slug = payload["slug"].as_str().unwrap_or_default().to_string();
        if self.failing_slugs.contains(&slug) {
            return Err(CmsError::Api {
                status: 503,
                message: "maintenance".into(),
            });
        }
        self.write(format!("create {} {slug}", kind.wp_rest_base()))?;
        self.payloads.lock().unwrap().push(payload.clone());
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = json!({ "id": id, "slug": slug });
        self.records
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, kind: ContentKind, id: u64, payload: &Value) -> Result<Value, CmsError> {
        self.write(format!("update {} {id}", kind.wp_rest_base()))?;
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(json!({ "id": id }))
    }

    async fn trash(&self, kind: ContentKind, id: u64) -> Result<(), CmsError> {
        self.write(format!("trash {} {id}", kind.wp_rest_base()))
    }

    async fn search_media(&self, stem: &str) -> Result<Vec<WpMedia>, CmsError> {
        Ok(self
            .media
            .iter()
            .filter(|m| m.source_url.contains(stem))
            .cloned()
            .collect())
    }

    async fn upload_media(&self, filename: &str, content_type: &str, _bytes: Vec<u8>) -> Result<WpMedia, CmsError> {
        self.write(format!("upload {filename}"))?;
        Ok(WpMedia {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            source_url: format!("http://wp.test/wp-content/uploads/{filename}"),
            mime_type: content_type.to_string(),
        })
    }

    async fn find_tag(&self, slug: &str) -> Result<Option<WpTerm>, CmsError> {
        Ok(self.tags.lock().unwrap().iter().find(|t| t.slug == slug).cloned())
    }

    async fn create_tag(&self, name: &str) -> Result<WpTerm, CmsError> {
        self.write(format!("tag {name}"))?;
        let term = WpTerm {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            slug: name.to_lowercase(),
        };
        self.tags.lock().unwrap().push(term.clone());
        Ok(term)
    }

    async fn current_user(&self) -> Result<WpUser, CmsError> {
        Ok(WpUser {
            id: 1,
            name: "Editor".into(),
            slug: "editor".into(),
        })
    }
}

// ── Sleeper ────────────────────────────────────────────────────────

/// Records requested delays without waiting.
#[derive(Default)]
pub struct CountingSleeper {
    pub delays: Mutex<Vec<Duration>>,
}

impl CountingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for CountingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
