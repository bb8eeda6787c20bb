//! Tag mutation integration tests (POST adds, DELETE removes, PUT replaces).
//!
//! Run with: `cargo test -p pictor-api --test tags_test`

mod helpers;

use helpers::auth::{OWNER_A_KEY, OWNER_B_KEY};
use helpers::workflows::initiate_upload;
use helpers::{api_path, setup_test_app};
use uuid::Uuid;

#[tokio::test]
async fn test_add_tags_merges_normalized() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &["beach"]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let response = client
        .post(&api_path(&format!("/files/{}/tags", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({"tags": ["Sunset", " BEACH "]}))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["tags"], serde_json::json!(["beach", "sunset"]));
}

#[tokio::test]
async fn test_remove_tags_is_a_difference() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(
        client,
        OWNER_A_KEY,
        "holiday.png",
        &["beach", "family", "sunset"],
    )
    .await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    // Removing an absent tag is harmless.
    let response = client
        .delete(&api_path(&format!("/files/{}/tags", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({"tags": ["Sunset", "missing"]}))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["tags"], serde_json::json!(["beach", "family"]));
}

#[tokio::test]
async fn test_replace_tags_overwrites() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &["beach"]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let response = client
        .put(&api_path(&format!("/files/{}/tags", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({"tags": ["Winter", "alps", "WINTER"]}))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["tags"], serde_json::json!(["alps", "winter"]));
}

/// A request that normalizes to nothing leaves the tags untouched on every
/// verb, including PUT.
#[tokio::test]
async fn test_blank_tag_mutation_is_noop() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &["beach"]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let empty = client
        .put(&api_path(&format!("/files/{}/tags", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({"tags": []}))
        .await;
    assert_eq!(empty.status_code(), 200);
    let body: serde_json::Value = empty.json();
    assert_eq!(body["tags"], serde_json::json!(["beach"]));

    let blank = client
        .post(&api_path(&format!("/files/{}/tags", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({"tags": ["", "   "]}))
        .await;
    assert_eq!(blank.status_code(), 200);
    let body: serde_json::Value = blank.json();
    assert_eq!(body["tags"], serde_json::json!(["beach"]));
}

#[tokio::test]
async fn test_missing_tags_field_is_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &[]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let response = client
        .post(&api_path(&format!("/files/{}/tags", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_tag_mutations_require_ownership() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &["beach"]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let foreign = client
        .post(&api_path(&format!("/files/{}/tags", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_B_KEY))
        .json(&serde_json::json!({"tags": ["stolen"]}))
        .await;
    assert_eq!(foreign.status_code(), 403);
    let body: serde_json::Value = foreign.json();
    assert_eq!(body["code"], "NOT_AUTHORIZED");

    let unknown = client
        .put(&api_path(&format!("/files/{}/tags", Uuid::new_v4())))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({"tags": ["x"]}))
        .await;
    assert_eq!(unknown.status_code(), 404);
}
