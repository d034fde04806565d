mod support;

use std::time::Duration;

use ferry_config::SyncConfig;
use ferry_core::{ContentKind, SyncResult};
use ferry_sync::{HeuristicMediaResolver, RunConfig, Scope, SyncContext, SyncDriver, SyncError};
use pretty_assertions::assert_eq;
use serde_json::json;
use support::{CountingSleeper, FakeDestination, FakeSource, STRAPI_BASE, strapi_record, wp_record};

fn dry_run() -> RunConfig {
    RunConfig::gate(false, true, &SyncConfig::default())
        .unwrap()
        .with_scope(Scope::WorksOnly)
}

fn confirmed() -> RunConfig {
    RunConfig::gate(true, false, &SyncConfig::default())
        .unwrap()
        .with_scope(Scope::WorksOnly)
}

async fn sync_works(
    source: &FakeSource,
    destination: &FakeDestination,
    sleeper: &CountingSleeper,
    run: RunConfig,
) -> Result<SyncResult, SyncError> {
    let resolver = HeuristicMediaResolver::new(source, destination, sleeper, &run);
    let driver = SyncDriver::new(source, destination, &resolver, sleeper, run);
    let mut ctx = SyncContext::new();
    driver.sync_kind(ContentKind::Work, &mut ctx).await
}

// ── sync ───────────────────────────────────────────────────────────

#[tokio::test]
async fn dry_run_counts_intended_writes_without_writing() {
    let source = FakeSource::with(
        ContentKind::Work,
        vec![
            strapi_record(1, "Harbor", "harbor", json!({})),
            strapi_record(2, "Lantern", "lantern", json!({"tags": "Branding"})),
            strapi_record(
                3,
                "Quiet Rooms",
                "quiet-rooms",
                json!({"mainImage": {"data": {"id": 9, "attributes": {"url": "/uploads/quiet.jpg"}}}}),
            ),
        ],
    )
    .asset("/uploads/quiet.jpg", "image/jpeg");
    let destination = FakeDestination::with(ContentKind::Work, vec![wp_record(5, "harbor", json!({}))]);
    let sleeper = CountingSleeper::default();

    let result = sync_works(&source, &destination, &sleeper, dry_run()).await.unwrap();

    assert_eq!(
        result,
        SyncResult {
            created: 2,
            updated: 0,
            skipped: 1,
            failed: 0,
            simulated: true,
        }
    );
    assert!(destination.writes().is_empty());
    assert_eq!(
        *source.probes.lock().unwrap(),
        vec![format!("{STRAPI_BASE}/uploads/quiet.jpg")]
    );
    assert!(source.downloads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn dry_run_skips_a_second_item_with_the_same_base_slug() {
    let source = FakeSource::with(
        ContentKind::Work,
        vec![
            strapi_record(1, "Lantern", "lantern", json!({})),
            strapi_record(2, "Lantern", "lantern-2", json!({})),
        ],
    );
    let destination = FakeDestination::default();
    let sleeper = CountingSleeper::default();

    let result = sync_works(&source, &destination, &sleeper, dry_run()).await.unwrap();
    assert_eq!((result.created, result.skipped), (1, 1));
}

#[tokio::test]
async fn confirmed_sync_uploads_media_creates_tags_and_records() {
    let source = FakeSource::with(
        ContentKind::Work,
        vec![
            strapi_record(1, "Harbor", "harbor", json!({})),
            strapi_record(
                2,
                "Lantern",
                "lantern",
                json!({
                    "tags": "Branding",
                    "body": "<p>Hello <strong>world</strong></p>",
                    "mainImage": {"url": "/uploads/lantern"}
                }),
            ),
        ],
    )
    .asset("/uploads/lantern", "image/webp");
    let destination = FakeDestination::with(ContentKind::Work, vec![wp_record(5, "harbor", json!({}))]);
    let sleeper = CountingSleeper::default();

    let result = sync_works(&source, &destination, &sleeper, confirmed()).await.unwrap();

    assert_eq!((result.created, result.skipped, result.simulated), (1, 1, false));
    assert_eq!(
        destination.writes(),
        vec!["upload lantern.webp", "tag Branding", "create works lantern"]
    );
    let payload = &destination.payloads()[0];
    assert_eq!(payload["content"], "Hello **world**\n");
    assert_eq!(payload["featured_media"], 100);
    assert_eq!(payload["acf"]["main_image"], 100);
    assert_eq!(payload["tags"], json!([101]));
    // Upload and tag creation came first, so the record write is paced.
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(500)]);
}

#[tokio::test]
async fn missing_source_image_leaves_the_field_unset() {
    let source = FakeSource::with(
        ContentKind::Work,
        vec![strapi_record(
            3,
            "Dock",
            "dock",
            json!({"mainImage": {"url": "/uploads/missing.jpg"}}),
        )],
    );
    let destination = FakeDestination::default();
    let sleeper = CountingSleeper::default();

    let result = sync_works(&source, &destination, &sleeper, confirmed()).await.unwrap();

    assert_eq!((result.created, result.failed), (1, 0));
    assert_eq!(destination.writes(), vec!["create works dock"]);
    assert_eq!(
        *source.downloads.lock().unwrap(),
        vec![format!("{STRAPI_BASE}/uploads/missing.jpg")]
    );
    let payload = &destination.payloads()[0];
    assert!(payload.get("featured_media").is_none());
    assert!(payload["acf"].get("main_image").is_none());
}

#[tokio::test]
async fn update_mode_rewrites_existing_records_in_place() {
    let source = FakeSource::with(
        ContentKind::Work,
        vec![strapi_record(1, "Harbor", "harbor", json!({"brief": "New brief"}))],
    );
    let destination = FakeDestination::with(ContentKind::Work, vec![wp_record(5, "harbor-2", json!({}))]);
    let sleeper = CountingSleeper::default();

    let run = confirmed().with_update_existing(true);
    let result = sync_works(&source, &destination, &sleeper, run).await.unwrap();

    assert_eq!(result.updated, 1);
    assert_eq!(destination.writes(), vec!["update works 5"]);
    let payload = &destination.payloads()[0];
    assert!(payload.get("slug").is_none());
    assert_eq!(payload["acf"]["brief"], "New brief\n");
}

#[tokio::test]
async fn failing_items_are_counted_and_the_pass_continues() {
    let source = FakeSource::with(
        ContentKind::Work,
        vec![
            strapi_record(1, "Lantern", "lantern", json!({})),
            strapi_record(2, "Quiet Rooms", "quiet-rooms", json!({})),
        ],
    );
    let mut destination = FakeDestination::default();
    destination.failing_slugs.insert("lantern".into());
    let sleeper = CountingSleeper::default();

    let result = sync_works(&source, &destination, &sleeper, confirmed()).await.unwrap();

    assert_eq!((result.created, result.failed), (1, 1));
    assert!(result.has_failures());
    assert_eq!(destination.writes(), vec!["create works quiet-rooms"]);
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn rejected_credentials_abort_the_run() {
    let source = FakeSource::with(
        ContentKind::Work,
        vec![
            strapi_record(1, "Lantern", "lantern", json!({})),
            strapi_record(2, "Quiet Rooms", "quiet-rooms", json!({})),
        ],
    );
    let destination = FakeDestination {
        reject_writes: true,
        ..FakeDestination::default()
    };
    let sleeper = CountingSleeper::default();

    let err = sync_works(&source, &destination, &sleeper, confirmed()).await.unwrap_err();
    assert!(matches!(err, SyncError::Authentication(_)));
    assert!(sleeper.delays().is_empty());
}

// ── dedupe ─────────────────────────────────────────────────────────

fn duplicated_destination() -> FakeDestination {
    FakeDestination::with(
        ContentKind::Work,
        vec![
            wp_record(3, "harbor", json!({"date_gmt": "2023-01-01T00:00:00"})),
            wp_record(7, "harbor-2", json!({"date_gmt": "2024-01-01T00:00:00"})),
            wp_record(9, "lantern", json!({})),
        ],
    )
}

#[tokio::test]
async fn dedupe_trashes_everything_but_the_survivor() {
    let source = FakeSource::default();
    let destination = duplicated_destination();
    let sleeper = CountingSleeper::default();
    let run = confirmed();
    let resolver = HeuristicMediaResolver::new(&source, &destination, &sleeper, &run);
    let driver = SyncDriver::new(&source, &destination, &resolver, &sleeper, run);

    let report = driver
        .dedupe_kind(ContentKind::Work, &mut SyncContext::new())
        .await
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].keep.id, 3);
    assert_eq!(report.trashed, 1);
    assert_eq!(destination.writes(), vec!["trash works 7"]);
}

#[tokio::test]
async fn dedupe_dry_run_only_reports_the_plan() {
    let source = FakeSource::default();
    let destination = duplicated_destination();
    let sleeper = CountingSleeper::default();
    let run = dry_run();
    let resolver = HeuristicMediaResolver::new(&source, &destination, &sleeper, &run);
    let driver = SyncDriver::new(&source, &destination, &resolver, &sleeper, run);

    let report = driver
        .dedupe_kind(ContentKind::Work, &mut SyncContext::new())
        .await
        .unwrap();

    assert!(report.simulated);
    assert_eq!(report.planned(), 1);
    assert_eq!(report.trashed, 0);
    assert!(destination.writes().is_empty());
}

// ── fix-content ────────────────────────────────────────────────────

#[tokio::test]
async fn fix_content_updates_only_changed_records() {
    let source = FakeSource::default();
    let destination = FakeDestination::with(
        ContentKind::Work,
        vec![
            wp_record(3, "harbor", json!({"content": {"raw": "<p>Hello <strong>there</strong></p>"}})),
            wp_record(4, "lantern", json!({"content": {"raw": "Already clean."}})),
        ],
    );
    let sleeper = CountingSleeper::default();
    let run = confirmed();
    let resolver = HeuristicMediaResolver::new(&source, &destination, &sleeper, &run);
    let driver = SyncDriver::new(&source, &destination, &resolver, &sleeper, run);

    let result = driver
        .fix_content_kind(ContentKind::Work, &mut SyncContext::new())
        .await
        .unwrap();

    assert_eq!((result.updated, result.skipped), (1, 1));
    assert_eq!(destination.writes(), vec!["update works 3"]);
    assert_eq!(destination.payloads()[0], json!({"content": "Hello **there**\n"}));
}

// ── repair-media ───────────────────────────────────────────────────

#[tokio::test]
async fn repair_media_attaches_missing_main_images() {
    let source = FakeSource::with(
        ContentKind::Work,
        vec![
            strapi_record(1, "Lantern", "lantern", json!({"mainImage": {"url": "/uploads/lantern.jpg"}})),
            strapi_record(2, "Harbor", "harbor", json!({"mainImage": {"url": "/uploads/harbor.jpg"}})),
        ],
    );
    let mut destination = FakeDestination::with(
        ContentKind::Work,
        vec![
            wp_record(9, "lantern", json!({})),
            wp_record(3, "harbor", json!({"acf": {"main_image": 12}})),
        ],
    );
    destination.media.push(ferry_cms::WpMedia {
        id: 44,
        source_url: "http://wp.test/wp-content/uploads/lantern.jpg".into(),
        mime_type: "image/jpeg".into(),
    });
    let sleeper = CountingSleeper::default();
    let run = confirmed();
    let resolver = HeuristicMediaResolver::new(&source, &destination, &sleeper, &run);
    let driver = SyncDriver::new(&source, &destination, &resolver, &sleeper, run);

    let result = driver
        .repair_media_kind(ContentKind::Work, &mut SyncContext::new())
        .await
        .unwrap();

    assert_eq!((result.updated, result.skipped), (1, 1));
    assert_eq!(destination.writes(), vec!["update works 9"]);
    assert_eq!(
        destination.payloads()[0],
        json!({"featured_media": 44, "acf": {"main_image": 44}})
    );
    assert!(source.downloads.lock().unwrap().is_empty());
}
