//! Per-field media normalizer.
//!
//! Strapi wraps relations differently depending on version, `populate`
//! depth, and whether the field is single or multiple:
//!
//! ```text
//! { "url": ... }                       bare media object
//! { "data": { "attributes": {...} } }  object wrapping `data`
//! [ {...}, {...} ]                     array of media objects
//! { "data": [ {...}, {...} ] }         array wrapped in `data`
//! ```
//!
//! WordPress ACF adds `{ID, url, alt}` image arrays, bare attachment IDs and
//! bare URL strings. Every shape collapses into an ordered `Vec<MediaRef>`
//! with null entries dropped.

use ferry_core::MediaRef;
use serde_json::{Map, Value};

/// Normalize any supported media shape into an ordered sequence.
///
/// Relative URLs (`/uploads/x.jpg`) are made absolute against `base_url`
/// when one is given.
#[must_use]
pub fn normalize_media(value: &Value, base_url: Option<&str>) -> Vec<MediaRef> {
    match value {
        Value::Object(map) if map.contains_key("data") => {
            normalize_media(map.get("data").unwrap_or(&Value::Null), base_url)
        }
        Value::Array(items) => items
            .iter()
            .flat_map(|item| normalize_media(item, base_url))
            .collect(),
        other => media_from_value(other, base_url).into_iter().collect(),
    }
}

/// Normalize a single-valued media field: the first entry of the sequence.
#[must_use]
pub fn normalize_single_media(value: &Value, base_url: Option<&str>) -> Option<MediaRef> {
    normalize_media(value, base_url).into_iter().next()
}

fn media_from_value(value: &Value, base_url: Option<&str>) -> Option<MediaRef> {
    match value {
        Value::Object(map) => media_from_object(map, base_url),
        Value::Number(n) => n.as_u64().filter(|id| *id > 0).map(MediaRef::from_destination_id),
        Value::String(s) if !s.trim().is_empty() => Some(media_from_url(s.trim(), base_url)),
        _ => None,
    }
}

fn media_from_object(map: &Map<String, Value>, base_url: Option<&str>) -> Option<MediaRef> {
    // Strapi v4 entry: { id, attributes: { url, ... } }
    if let Some(Value::Object(attributes)) = map.get("attributes") {
        let mut media = media_from_object(attributes, base_url)?;
        if media.source_id.is_none() {
            media.source_id = id_string(map.get("id"));
        }
        return Some(media);
    }

    let url = ["url", "source_url"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .filter(|url| !url.trim().is_empty());

    let Some(url) = url else {
        // ACF image field with return format "array" but no URL: keep the ID.
        return ["ID", "id"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_u64))
            .map(MediaRef::from_destination_id);
    };

    let mut media = media_from_url(url.trim(), base_url);
    media.mime_type = ["mime", "mime_type"]
        .iter()
        .find_map(|key| non_empty_str(map.get(*key)));
    media.alt = ["alternativeText", "alt", "alt_text"]
        .iter()
        .find_map(|key| non_empty_str(map.get(*key)));
    media.source_id = id_string(map.get("id").or_else(|| map.get("ID")));
    Some(media)
}

fn media_from_url(url: &str, base_url: Option<&str>) -> MediaRef {
    let absolute = match base_url {
        Some(base) if url.starts_with('/') && !url.starts_with("//") => {
            format!("{}{url}", base.trim_end_matches('/'))
        }
        _ => url.to_string(),
    };
    MediaRef::from_url(absolute)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::MediaId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn hero() -> Value {
        json!({
            "id": 7,
            "url": "/uploads/hero%20shot.jpg",
            "mime": "image/jpeg",
            "alternativeText": "Harbor at dusk"
        })
    }

    fn gallery() -> Vec<Value> {
        vec![
            json!({"id": 8, "url": "/uploads/one.png", "mime": "image/png"}),
            json!(null),
            json!({"id": 9, "url": "/uploads/two.webp", "mime": "image/webp"}),
        ]
    }

    #[test]
    fn four_single_shapes_are_equivalent() {
        let base = Some("https://cms.example.com");
        let bare = normalize_single_media(&hero(), base);
        let wrapped = normalize_single_media(&json!({"data": hero()}), base);
        let array = normalize_single_media(&json!([hero()]), base);
        let wrapped_array = normalize_single_media(&json!({"data": [hero()]}), base);

        let expected = bare.clone().expect("bare media normalizes");
        assert_eq!(expected.source_url, "https://cms.example.com/uploads/hero%20shot.jpg");
        assert_eq!(expected.filename, "hero shot.jpg");
        assert_eq!(expected.alt.as_deref(), Some("Harbor at dusk"));
        assert_eq!(expected.source_id.as_deref(), Some("7"));
        assert_eq!(wrapped, bare);
        assert_eq!(array, bare);
        assert_eq!(wrapped_array, bare);
    }

    #[test]
    fn four_sequence_shapes_are_equivalent() {
        let items = gallery();
        let array = normalize_media(&Value::Array(items.clone()), None);
        let wrapped = normalize_media(&json!({"data": items}), None);
        let v4: Vec<Value> = gallery()
            .into_iter()
            .map(|item| match item {
                Value::Null => Value::Null,
                Value::Object(mut map) => {
                    let id = map.remove("id").unwrap_or(Value::Null);
                    json!({"id": id, "attributes": Value::Object(map)})
                }
                other => other,
            })
            .collect();
        let v4_wrapped = normalize_media(&json!({"data": v4}), None);

        assert_eq!(array.len(), 2, "null entries are dropped");
        assert_eq!(array[0].filename, "one.png");
        assert_eq!(array[1].mime_type.as_deref(), Some("image/webp"));
        assert_eq!(wrapped, array);
        assert_eq!(v4_wrapped, array);
    }

    #[test]
    fn null_shapes_are_empty() {
        assert!(normalize_media(&json!(null), None).is_empty());
        assert!(normalize_media(&json!({"data": null}), None).is_empty());
        assert!(normalize_media(&json!(false), None).is_empty());
        assert!(normalize_media(&json!(""), None).is_empty());
        assert!(normalize_media(&json!([]), None).is_empty());
    }

    #[test]
    fn acf_image_array() {
        let media = normalize_single_media(
            &json!({
                "ID": 311,
                "url": "https://admin.example.com/wp-content/uploads/2024/02/logo.svg",
                "alt": "Client logo",
                "mime_type": "image/svg+xml"
            }),
            None,
        )
        .unwrap();
        assert_eq!(media.filename, "logo.svg");
        assert_eq!(media.source_id.as_deref(), Some("311"));
        assert_eq!(media.mime_type.as_deref(), Some("image/svg+xml"));
    }

    #[test]
    fn acf_attachment_id_and_url_formats() {
        let by_id = normalize_single_media(&json!(311), None).unwrap();
        assert_eq!(by_id.destination_id, Some(MediaId::Remote(311)));

        let by_url =
            normalize_single_media(&json!("https://admin.example.com/a/b/c.jpg"), None).unwrap();
        assert_eq!(by_url.filename, "c.jpg");
        assert_eq!(by_url.destination_id, None);
    }

    #[test]
    fn protocol_relative_urls_are_not_prefixed() {
        let media = normalize_single_media(
            &json!({"url": "//cdn.example.com/x.jpg"}),
            Some("https://cms.example.com"),
        )
        .unwrap();
        assert_eq!(media.source_url, "//cdn.example.com/x.jpg");
    }
}
