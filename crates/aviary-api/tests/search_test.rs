//! Search API integration tests.
//!
//! Run with: `cargo test -p aviary-api --test search_test`

mod helpers;

use helpers::{api_path, ingest_media, setup_test_app, MEDIA_URL, THUMB_URL};

const AUDIO_URL: &str = "https://birds.s3.amazonaws.com/media/dawn-chorus.wav";

async fn search(app: &helpers::TestApp, tags: serde_json::Value) -> (u16, serde_json::Value) {
    let response = app
        .client()
        .post(&api_path("/search"))
        .json(&serde_json::json!({ "tags": tags }))
        .await;
    let status = response.status_code().as_u16();
    (status, response.json())
}

#[tokio::test]
async fn test_round_trip_minimum_count() {
    let app = setup_test_app();
    ingest_media(
        &app,
        MEDIA_URL,
        Some(THUMB_URL),
        serde_json::json!({"crow": 2}),
    )
    .await;

    let (status, data) = search(&app, serde_json::json!({"crow": 2})).await;
    assert_eq!(status, 200);
    // Images resolve to their thumbnail.
    assert_eq!(data["links"], serde_json::json!([THUMB_URL]));
    assert_eq!(data["count"], 1);

    let (status, data) = search(&app, serde_json::json!({"crow": 3})).await;
    assert_eq!(status, 200);
    assert_eq!(data["count"], 0);
}

#[tokio::test]
async fn test_intersection_returns_only_records_matching_all_criteria() {
    let app = setup_test_app();
    // A: {crow: 2}; B: {crow: 2, pigeon: 1}
    ingest_media(
        &app,
        MEDIA_URL,
        Some(THUMB_URL),
        serde_json::json!({"crow": 2}),
    )
    .await;
    let response = app
        .client()
        .post(&api_path("/media"))
        .json(&serde_json::json!({
            "s3_url": AUDIO_URL,
            "file_type": "audio",
            "tags": {"crow": 2, "pigeon": 1},
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let (status, data) = search(&app, serde_json::json!({"crow": 2, "pigeon": 1})).await;
    assert_eq!(status, 200);
    // Audio has no thumbnail; it resolves to its canonical URL.
    assert_eq!(data["links"], serde_json::json!([AUDIO_URL]));
}

#[tokio::test]
async fn test_empty_criteria_is_rejected() {
    let app = setup_test_app();

    let (status, data) = search(&app, serde_json::json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(data["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_no_match_is_an_empty_success() {
    let app = setup_test_app();
    ingest_media(&app, MEDIA_URL, None, serde_json::json!({"crow": 1})).await;

    let (status, data) = search(&app, serde_json::json!({"heron": 1})).await;
    assert_eq!(status, 200);
    assert_eq!(data["links"], serde_json::json!([]));
    assert_eq!(data["count"], 0);
}
