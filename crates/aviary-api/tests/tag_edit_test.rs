//! Bulk tag edit API integration tests.
//!
//! Run with: `cargo test -p aviary-api --test tag_edit_test`

mod helpers;

use aviary_store::RecordStore;
use helpers::{api_path, ingest_media, setup_test_app, MEDIA_URL, THUMB_URL};

#[tokio::test]
async fn test_increment_through_thumbnail_url() {
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
        .post(&api_path("/media/tags"))
        .json(&serde_json::json!({
            "urls": [THUMB_URL],
            "operation": 1,
            "tags": ["crow, 2"],
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    assert_eq!(data["message"], "Tags updated");
    assert_eq!(data["results"][0]["status"], 200);

    // The canonical record changed, not one keyed by the thumbnail URL.
    let record = app.records.get(MEDIA_URL).await.unwrap().unwrap();
    assert_eq!(record.tags.get("crow"), Some(&3));
    assert!(app.records.get(THUMB_URL).await.unwrap().is_none());
}

#[tokio::test]
async fn test_decrement_removes_species_at_zero() {
    let app = setup_test_app();
    ingest_media(&app, MEDIA_URL, None, serde_json::json!({"pigeon": 2})).await;

    let response = app
        .client()
        .post(&api_path("/media/tags"))
        .json(&serde_json::json!({
            "urls": [MEDIA_URL],
            "operation": 0,
            "tags": ["pigeon, 5"],
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let record = app.records.get(MEDIA_URL).await.unwrap().unwrap();
    assert!(!record.tags.contains_key("pigeon"));
    assert!(app.index.is_empty());
}

#[tokio::test]
async fn test_partial_failure_is_reported_per_id() {
    let app = setup_test_app();
    ingest_media(&app, MEDIA_URL, None, serde_json::json!({"crow": 1})).await;

    let ghost = "https://birds.s3.amazonaws.com/media/thumbs/ghost-thumb.jpg";
    let response = app
        .client()
        .post(&api_path("/media/tags"))
        .json(&serde_json::json!({
            "urls": [ghost, MEDIA_URL],
            "operation": 1,
            "tags": ["crow, 1"],
        }))
        .await;

    // The batch as a whole succeeds; failure is per member.
    assert_eq!(response.status_code(), 200);
    let data: serde_json::Value = response.json();
    assert_eq!(data["results"][0]["status"], 404);
    assert!(data["results"][0]["error"].is_string());
    assert_eq!(data["results"][1]["status"], 200);

    let record = app.records.get(MEDIA_URL).await.unwrap().unwrap();
    assert_eq!(record.tags.get("crow"), Some(&2));
}

#[tokio::test]
async fn test_rejects_missing_urls() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/media/tags"))
        .json(&serde_json::json!({
            "operation": 1,
            "tags": ["crow, 1"],
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_rejects_unknown_operation() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/media/tags"))
        .json(&serde_json::json!({
            "urls": [MEDIA_URL],
            "operation": 2,
            "tags": ["crow, 1"],
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert_eq!(data["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_rejects_malformed_tag_pairs() {
    let app = setup_test_app();

    for bad in ["crow", "crow, x", "crow, 0"] {
        let response = app
            .client()
            .post(&api_path("/media/tags"))
            .json(&serde_json::json!({
                "urls": [MEDIA_URL],
                "operation": 1,
                "tags": [bad],
            }))
            .await;
        assert_eq!(response.status_code(), 400, "pair '{}' was accepted", bad);
    }
}

#[tokio::test]
async fn test_rejects_oversized_batch() {
    let app = setup_test_app();
    let urls: Vec<String> = (0..51)
        .map(|i| format!("https://birds.s3.amazonaws.com/media/{}.jpg", i))
        .collect();

    let response = app
        .client()
        .post(&api_path("/media/tags"))
        .json(&serde_json::json!({
            "urls": urls,
            "operation": 1,
            "tags": ["crow, 1"],
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}
