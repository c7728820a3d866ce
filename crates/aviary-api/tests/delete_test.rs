//! Delete API integration tests.
//!
//! Run with: `cargo test -p aviary-api --test delete_test`

mod helpers;

use aviary_store::{AliasMap, RecordStore};
use helpers::{api_path, ingest_media, setup_test_app, MEDIA_URL, THUMB_URL};

#[tokio::test]
async fn test_delete_cascades_to_index_and_alias() {
    let app = setup_test_app();
    ingest_media(
        &app,
        MEDIA_URL,
        Some(THUMB_URL),
        serde_json::json!({"crow": 1, "pigeon": 2}),
    )
    .await;

    let response = app
        .client()
        .post(&api_path("/media/batch/delete"))
        .json(&serde_json::json!({ "urls": [MEDIA_URL] }))
        .await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    assert_eq!(data["deleted"], serde_json::json!([MEDIA_URL]));
    assert_eq!(data["results"][0]["status"], 204);

    assert!(app.records.get(MEDIA_URL).await.unwrap().is_none());
    assert!(app.index.is_empty());
    assert_eq!(app.aliases.get(THUMB_URL).await.unwrap(), None);
    // External object delete was attempted with the derived bucket and key.
    assert_eq!(
        app.objects.deleted(),
        vec![("birds".to_string(), "media/file123.jpg".to_string())]
    );

    // A subsequent search no longer finds the media.
    let response = app
        .client()
        .post(&api_path("/search"))
        .json(&serde_json::json!({ "tags": {"crow": 1} }))
        .await;
    let found: serde_json::Value = response.json();
    assert_eq!(found["count"], 0);
}

#[tokio::test]
async fn test_delete_thumbnail_only_removes_alias() {
    let app = setup_test_app();
    ingest_media(
        &app,
        MEDIA_URL,
        Some(THUMB_URL),
        serde_json::json!({"crow": 1}),
    )
    .await;

    let response = app
        .client()
        .post(&api_path("/media/batch/delete"))
        .json(&serde_json::json!({ "urls": [THUMB_URL] }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.aliases.get(THUMB_URL).await.unwrap(), None);
    assert!(app.records.get(MEDIA_URL).await.unwrap().is_some());
    assert_eq!(app.index.len(), 1);
}

#[tokio::test]
async fn test_delete_partial_failure_lists_successes() {
    let app = setup_test_app();
    ingest_media(&app, MEDIA_URL, None, serde_json::json!({"crow": 1})).await;

    let response = app
        .client()
        .post(&api_path("/media/batch/delete"))
        .json(&serde_json::json!({ "urls": ["not-a-url", MEDIA_URL] }))
        .await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    assert_eq!(data["deleted"], serde_json::json!([MEDIA_URL]));
    assert_eq!(data["results"][0]["status"], 400);
    assert_eq!(data["results"][1]["status"], 204);
}

#[tokio::test]
async fn test_delete_requires_urls() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/media/batch/delete"))
        .json(&serde_json::json!({ "urls": [] }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = setup_test_app();
    ingest_media(&app, MEDIA_URL, None, serde_json::json!({"crow": 1})).await;

    for _ in 0..2 {
        let response = app
            .client()
            .post(&api_path("/media/batch/delete"))
            .json(&serde_json::json!({ "urls": [MEDIA_URL] }))
            .await;
        assert_eq!(response.status_code(), 200);
        let data: serde_json::Value = response.json();
        assert_eq!(data["results"][0]["status"], 204);
    }
}
