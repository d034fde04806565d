//! WordPress request bodies built from canonical items.
//!
//! Core post fields go at the top level; everything custom goes under `acf`.
//! Media fields are written as attachment IDs and only when the ID is real:
//! unresolved and [`MediaId::Pending`] references are left out.

use ferry_core::{ContentItem, MediaId, MediaRef};
use serde_json::{Map, Value, json};

/// WordPress date format (site-local, no offset).
const WP_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `publish` for live items, `draft` for drafts, archived items and items
/// whose source status is `draft`.
#[must_use]
pub fn wp_status(item: &ContentItem) -> &'static str {
    let draft_status = item
        .status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("draft"));
    if item.is_publishable() && !draft_status {
        "publish"
    } else {
        "draft"
    }
}

fn remote_id(media: Option<&MediaRef>) -> Option<u64> {
    media
        .and_then(|m| m.destination_id)
        .and_then(MediaId::remote)
}

/// Full body for creating (or fully updating) a record.
#[must_use]
pub fn build_payload(item: &ContentItem, tag_ids: &[u64]) -> Value {
    let mut body = Map::new();
    body.insert("title".into(), json!(item.name));
    body.insert("slug".into(), json!(item.slug));
    body.insert("status".into(), json!(wp_status(item)));
    if let Some(date) = item.publish_date {
        body.insert("date".into(), json!(date.format(WP_DATE_FORMAT).to_string()));
    }
    if let Some(content) = &item.body {
        body.insert("content".into(), json!(content));
    }
    if !tag_ids.is_empty() {
        body.insert("tags".into(), json!(tag_ids));
    }
    if let Some(id) = remote_id(item.thumbnail_image.as_ref()).or_else(|| remote_id(item.main_image.as_ref())) {
        body.insert("featured_media".into(), json!(id));
    }

    let mut acf = Map::new();
    acf.insert("featured".into(), json!(item.featured));
    acf.insert("archived".into(), json!(item.archived));
    for (key, value) in [
        ("client", &item.client),
        ("description", &item.description),
        ("brief", &item.brief),
        ("scope", &item.scope),
        ("details", &item.details),
    ] {
        if let Some(value) = value {
            acf.insert(key.into(), json!(value));
        }
    }
    acf.extend(media_fields(item));
    body.insert("acf".into(), Value::Object(acf));
    Value::Object(body)
}

/// Body for updating an existing record: the full body minus the slug, so
/// a surviving `name-2` record keeps its URL.
#[must_use]
pub fn build_update_payload(item: &ContentItem, tag_ids: &[u64]) -> Value {
    let mut payload = build_payload(item, tag_ids);
    if let Value::Object(body) = &mut payload {
        body.remove("slug");
    }
    payload
}

/// ACF media fields with a real attachment ID.
fn media_fields(item: &ContentItem) -> Map<String, Value> {
    let mut fields = Map::new();
    for (key, media) in [
        ("main_image", &item.main_image),
        ("cover_image", &item.cover_image),
        ("client_logo", &item.client_logo),
        ("thumbnail_image", &item.thumbnail_image),
    ] {
        if let Some(id) = remote_id(media.as_ref()) {
            fields.insert(key.into(), json!(id));
        }
    }
    let gallery: Vec<u64> = item
        .gallery
        .iter()
        .filter_map(|m| remote_id(Some(m)))
        .collect();
    if !gallery.is_empty() {
        fields.insert("gallery".into(), json!(gallery));
    }
    fields
}

/// Partial body carrying only the media fields, plus `featured_media` when
/// a main image is set. `None` when nothing resolved.
#[must_use]
pub fn media_patch(item: &ContentItem) -> Option<Value> {
    let acf = media_fields(item);
    if acf.is_empty() {
        return None;
    }
    let mut body = Map::new();
    if let Some(id) = remote_id(item.main_image.as_ref()) {
        body.insert("featured_media".into(), json!(id));
    }
    body.insert("acf".into(), Value::Object(acf));
    Some(Value::Object(body))
}

fn changed(before: Option<&String>, after: Option<&String>) -> bool {
    before.map(|s| s.trim()) != after.map(|s| s.trim())
}

/// Partial body with the rich-text fields that differ between `before` and
/// `after`, ignoring surrounding whitespace. `None` when nothing changed.
#[must_use]
pub fn rich_text_patch(before: &ContentItem, after: &ContentItem) -> Option<Value> {
    let mut body = Map::new();
    let mut acf = Map::new();
    if changed(before.body.as_ref(), after.body.as_ref())
        && let Some(content) = &after.body
    {
        body.insert("content".into(), json!(content));
    }
    for (key, old, new) in [
        ("description", &before.description, &after.description),
        ("brief", &before.brief, &after.brief),
        ("scope", &before.scope, &after.scope),
        ("details", &before.details, &after.details),
    ] {
        if changed(old.as_ref(), new.as_ref())
            && let Some(value) = new
        {
            acf.insert(key.into(), json!(value));
        }
    }
    if !acf.is_empty() {
        body.insert("acf".into(), Value::Object(acf));
    }
    (!body.is_empty()).then_some(Value::Object(body))
}
