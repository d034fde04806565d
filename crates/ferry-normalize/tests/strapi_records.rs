use ferry_core::{ContentKind, MediaId};
use ferry_normalize::{NormalizeOptions, normalize_all, normalize_destination, normalize_single_media, parse_boolean};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

const BASE: &str = "https://cms.example.com";

fn options() -> NormalizeOptions<'static> {
    NormalizeOptions::new(ContentKind::Work).with_media_base(BASE)
}

#[rstest]
#[case::bare(json!({"id": 9, "url": "/uploads/lantern.jpg"}))]
#[case::wrapped(json!({"data": {"id": 9, "attributes": {"url": "/uploads/lantern.jpg"}}}))]
#[case::array(json!([{"id": 9, "url": "/uploads/lantern.jpg"}]))]
#[case::wrapped_array(json!({"data": [{"id": 9, "attributes": {"url": "/uploads/lantern.jpg"}}]}))]
fn every_media_shape_yields_the_same_reference(#[case] shape: Value) {
    let media = normalize_single_media(&shape, Some(BASE)).expect("media");

    assert_eq!(media.source_url, "https://cms.example.com/uploads/lantern.jpg");
    assert_eq!(media.filename, "lantern.jpg");
    assert_eq!(media.source_id.as_deref(), Some("9"));
}

#[test]
fn strapi_v4_collection_normalizes_end_to_end() {
    let records = vec![
        json!({
            "id": 1,
            "attributes": {
                "name": "Lantern",
                "slug": "lantern",
                "publishedAt": "2024-03-01T10:00:00.000Z",
                "featured": "Yes",
                "archived": "0",
                "tags": "Branding, Print",
                "brief": "A light in the dark.",
                "mainImage": {"data": {"id": 9, "attributes": {"url": "/uploads/lantern.jpg", "mime": "image/jpeg"}}},
                "gallery": {"data": [
                    {"id": 10, "attributes": {"url": "/uploads/g1.png"}},
                    {"id": 11, "attributes": {"url": "https://cdn.example.com/g2.png"}}
                ]}
            }
        }),
        json!({
            "id": 2,
            "attributes": {"name": "Quiet Rooms", "publishedAt": null, "mainImage": {"data": null}}
        }),
        json!({"id": 3, "attributes": {"brief": "no name, no slug"}}),
        json!("not a record"),
    ];

    let items = normalize_all(&records, options());
    assert_eq!(items.len(), 2);

    let lantern = &items[0];
    assert_eq!(lantern.source_id.as_deref(), Some("1"));
    assert_eq!(lantern.status.as_deref(), Some("published"));
    assert!(lantern.featured);
    assert!(!lantern.archived);
    assert_eq!(lantern.tags, vec!["Branding", "Print"]);
    assert_eq!(lantern.brief.as_deref(), Some("A light in the dark."));
    let main = lantern.main_image.as_ref().expect("main image");
    assert_eq!(main.mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!(
        lantern
            .gallery
            .iter()
            .map(|m| m.source_url.as_str())
            .collect::<Vec<_>>(),
        vec!["https://cms.example.com/uploads/g1.png", "https://cdn.example.com/g2.png"]
    );

    let quiet = &items[1];
    assert_eq!(quiet.slug, "quiet-rooms");
    assert_eq!(quiet.status.as_deref(), Some("draft"));
    assert!(quiet.main_image.is_none());
}

#[test]
fn strapi_v5_flat_records_use_the_same_rules() {
    let records = vec![json!({
        "id": 4,
        "documentId": "abc123",
        "name": "Harbor",
        "slug": "harbor",
        "featured": true,
        "coverImage": {"url": "/uploads/harbor-cover.webp"}
    })];

    let items = normalize_all(&records, options());
    assert_eq!(items[0].document_id.as_deref(), Some("abc123"));
    assert!(items[0].featured);
    assert_eq!(
        items[0].cover_image.as_ref().map(|m| m.filename.as_str()),
        Some("harbor-cover.webp")
    );
}

#[test]
fn wordpress_records_keep_attachment_ids() {
    let record = json!({
        "id": 31,
        "slug": "harbor-2",
        "date_gmt": "2024-01-05T08:00:00",
        "title": {"rendered": "Harbor"},
        "acf": {"main_image": 77, "gallery": [{"ID": 78, "url": "https://admin.example.com/wp-content/uploads/h.jpg"}]}
    });

    let destination = normalize_destination(&record, ContentKind::Work).expect("record");
    assert_eq!(destination.id, 31);
    assert_eq!(destination.slug, "harbor-2");
    assert!(destination.date.is_some());
    assert_eq!(
        destination.item.main_image.and_then(|m| m.destination_id),
        Some(MediaId::Remote(77))
    );
    assert_eq!(destination.item.gallery[0].filename, "h.jpg");
}

#[rstest]
#[case("Yes", true)]
#[case("TRUE", true)]
#[case(" on ", true)]
#[case("1", true)]
#[case("0", false)]
#[case("", false)]
#[case("no", false)]
#[case("maybe", false)]
fn boolean_strings(#[case] raw: &str, #[case] expected: bool) {
    assert_eq!(parse_boolean(raw), expected);
}
