//! Raw CMS record → canonical [`ContentItem`].
//!
//! The JSON shape is resolved exactly once, in [`RawRecord::classify`]. Field
//! readers below only ever see a flat field map (plus an optional ACF map),
//! so no downstream code branches on the envelope.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ferry_core::{ContentItem, ContentKind, DestinationRecord};
use serde_json::{Map, Value};

use crate::boolean::value_as_bool;
use crate::media::{normalize_media, normalize_single_media};
use crate::slug::slugify;

/// A raw record, classified by envelope shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// Strapi v4 `{ id, attributes: {...} }`.
    Nested {
        id: Option<Value>,
        document_id: Option<Value>,
        attributes: Map<String, Value>,
    },
    /// Strapi v5 flat records and WordPress REST records.
    Flat(Map<String, Value>),
}

impl RawRecord {
    /// Classify a decoded JSON value. Non-objects yield `None`.
    #[must_use]
    pub fn classify(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        match map.get("attributes") {
            Some(Value::Object(attributes)) => Some(Self::Nested {
                id: map.get("id").cloned(),
                document_id: map.get("documentId").cloned(),
                attributes: attributes.clone(),
            }),
            _ => Some(Self::Flat(map.clone())),
        }
    }

    /// Unwrap one level: nested attributes become the flat map, with `id` and
    /// `documentId` from the envelope preserved.
    #[must_use]
    pub fn into_flat(self) -> Map<String, Value> {
        match self {
            Self::Flat(map) => map,
            Self::Nested {
                id,
                document_id,
                mut attributes,
            } => {
                if let Some(id) = id {
                    attributes.insert("id".into(), id);
                }
                if let Some(document_id) = document_id {
                    attributes.entry("documentId").or_insert(document_id);
                }
                attributes
            }
        }
    }
}

/// Options for one normalization call.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions<'a> {
    pub kind: ContentKind,
    /// Base URL that relative media URLs are resolved against.
    pub media_base: Option<&'a str>,
}

impl<'a> NormalizeOptions<'a> {
    #[must_use]
    pub const fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            media_base: None,
        }
    }

    #[must_use]
    pub const fn with_media_base(mut self, base: &'a str) -> Self {
        self.media_base = Some(base);
        self
    }
}

/// Field lookup across the top-level map and the ACF map.
struct Fields<'a> {
    top: &'a Map<String, Value>,
    acf: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    fn new(top: &'a Map<String, Value>) -> Self {
        Self {
            top,
            acf: top.get("acf").and_then(Value::as_object),
        }
    }

    /// First non-null value under any of `keys`, top level before ACF.
    fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        std::iter::once(self.top)
            .chain(self.acf)
            .flat_map(|map| keys.iter().filter_map(move |key| map.get(*key)))
            .find(|value| !value.is_null())
    }

    /// Every non-null value under any of `keys`, top level before ACF.
    fn all(&self, keys: &'a [&'a str]) -> impl Iterator<Item = &'a Value> + 'a {
        let acf = self.acf;
        std::iter::once(self.top)
            .chain(acf)
            .flat_map(move |map| keys.iter().filter_map(move |key| map.get(*key)))
            .filter(|value| !value.is_null())
    }

    fn text(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).and_then(text_of)
    }
}

/// Normalize one raw record. Returns `None`, with a warning, when the record
/// has neither a slug nor a derivable title.
#[must_use]
pub fn normalize_item(value: &Value, options: NormalizeOptions<'_>) -> Option<ContentItem> {
    let Some(record) = RawRecord::classify(value) else {
        tracing::warn!(kind = %options.kind, "skipping non-object record");
        return None;
    };
    let flat = record.into_flat();
    let fields = Fields::new(&flat);

    let source_id = fields.get(&["id"]).and_then(id_string);
    let name = fields
        .text(&["name", "title"])
        .map(|name| decode_title_entities(&name))
        .unwrap_or_default();
    let slug = fields
        .text(&["slug"])
        .map(|slug| slug.trim().to_string())
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| slugify(&name));

    if slug.is_empty() {
        tracing::warn!(
            kind = %options.kind,
            id = source_id.as_deref().unwrap_or("?"),
            "skipping record with no slug and no derivable title"
        );
        return None;
    }

    let display_name = if name.is_empty() { slug.clone() } else { name };
    let mut item = ContentItem::new(options.kind, display_name, slug);
    item.source_id = source_id;
    item.document_id = fields.get(&["documentId"]).and_then(id_string);
    item.status = read_status(&fields);
    item.featured = value_as_bool(fields.get(&["featured", "is_featured"]));
    item.draft = value_as_bool(fields.get(&["draft", "is_draft"]));
    item.archived = value_as_bool(fields.get(&["archived", "is_archived"]));
    item.tags = read_tags(&fields);
    item.publish_date = fields
        .get(&["publishDate", "publish_date", "publishedAt", "date_gmt", "date"])
        .and_then(Value::as_str)
        .and_then(parse_date);
    item.client = fields.text(&["client", "clientName", "client_name"]);
    item.body = fields.text(&["body", "content"]);
    item.description = fields.text(&["description", "excerpt"]);
    item.brief = fields.text(&["brief"]);
    item.scope = fields.text(&["scope"]);
    item.details = fields.text(&["details"]);

    let base = options.media_base;
    item.main_image = fields
        .get(&["mainImage", "main_image"])
        .and_then(|v| normalize_single_media(v, base));
    item.cover_image = fields
        .get(&["coverImage", "cover_image"])
        .and_then(|v| normalize_single_media(v, base));
    item.client_logo = fields
        .get(&["clientLogo", "client_logo"])
        .and_then(|v| normalize_single_media(v, base));
    item.thumbnail_image = fields
        .get(&["thumbnailImage", "thumbnail_image"])
        .and_then(|v| normalize_single_media(v, base));
    item.gallery = fields
        .get(&["gallery"])
        .map(|v| normalize_media(v, base))
        .unwrap_or_default();

    Some(item)
}

/// Normalize a list, skipping (and logging) unusable records.
#[must_use]
pub fn normalize_all(values: &[Value], options: NormalizeOptions<'_>) -> Vec<ContentItem> {
    values
        .iter()
        .filter_map(|value| normalize_item(value, options))
        .collect()
}

/// Normalize a WordPress REST record into a destination record. Requires a
/// numeric `id`.
#[must_use]
pub fn normalize_destination(value: &Value, kind: ContentKind) -> Option<DestinationRecord> {
    let id = value.get("id").and_then(Value::as_u64)?;
    let item = normalize_item(value, NormalizeOptions::new(kind))?;
    Some(DestinationRecord {
        id,
        slug: item.slug.clone(),
        date: item.publish_date,
        item,
    })
}

fn read_status(fields: &Fields<'_>) -> Option<String> {
    if let Some(status) = fields.text(&["status"]) {
        return Some(status);
    }
    // Strapi v4 has no status; draft entries have a null `publishedAt`.
    if fields.top.contains_key("publishedAt") {
        let published = fields.get(&["publishedAt"]).is_some();
        return Some(if published { "published" } else { "draft" }.to_string());
    }
    None
}

fn read_tags(fields: &Fields<'_>) -> Vec<String> {
    for value in fields.all(&["tags", "tag_names"]) {
        let tags = tags_from_value(value);
        if !tags.is_empty() {
            return tags;
        }
    }
    Vec::new()
}

fn tags_from_value(value: &Value) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    match value {
        Value::String(s) => {
            tags.extend(s.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from));
        }
        Value::Array(items) => {
            for item in items {
                tags.extend(tags_from_value(item));
            }
        }
        Value::Object(map) => {
            if let Some(data) = map.get("data") {
                return tags_from_value(data);
            }
            if let Some(attributes) = map.get("attributes") {
                return tags_from_value(attributes);
            }
            if let Some(name) = map.get("name").and_then(Value::as_str) {
                let name = name.trim();
                if !name.is_empty() {
                    tags.push(name.to_string());
                }
            }
        }
        _ => {}
    }
    let mut seen = std::collections::HashSet::new();
    tags.retain(|tag| seen.insert(tag.to_lowercase()));
    tags
}

/// Text of a string field or a WordPress `{rendered}` object.
fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map
            .get("raw")
            .or_else(|| map.get("rendered"))
            .and_then(Value::as_str)?,
        _ => return None,
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Parse the date formats both CMSes emit: RFC 3339, WordPress naive
/// `YYYY-MM-DDTHH:MM:SS` (treated as UTC), `YYYY-MM-DD`, and ACF `Ymd`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    ["%Y-%m-%d", "%Y%m%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Decode the entities WordPress puts in rendered titles.
fn decode_title_entities(title: &str) -> String {
    html_escape::decode_html_entities(title).replace('\u{a0}', " ")
}
