//! Upload API integration tests.
//!
//! Run with: `cargo test -p pictor-api --test uploads_test`

mod helpers;

use helpers::auth::{OWNER_A_KEY, OWNER_B_KEY};
use helpers::workflows::{initiate_upload, upload_completed_file};
use helpers::{api_path, setup_test_app};
use uuid::Uuid;

#[tokio::test]
async fn test_initiate_upload_returns_write_grant() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/uploads"))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({
            "filename": "holiday.png",
            "contentType": "image/png",
            "sizeBytes": 2048,
            "tags": ["Holiday", "beach"],
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: serde_json::Value = response.json();

    let file_id = Uuid::parse_str(
        body["fileId"]
            .as_str()
            .expect("Expected 'fileId' in initiate response"),
    )
    .expect("Invalid UUID in initiate response");

    let s3_key = body["s3Key"].as_str().expect("Expected 's3Key'");
    assert!(s3_key.starts_with("uploads/"));
    assert!(s3_key.contains(&file_id.to_string()));

    let write_url = body["writeUrl"].as_str().expect("Expected 'writeUrl'");
    assert!(write_url.contains(s3_key));
    assert!(body["expiresAt"].is_string());
    // No batch was requested, so the field is absent entirely.
    assert!(body.get("batchId").is_none());

    let status_response = client
        .get(&api_path(&format!("/uploads/{}/status", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;

    assert_eq!(status_response.status_code(), 200);
    let status_body: serde_json::Value = status_response.json();
    assert_eq!(status_body["status"], "pending");
}

#[tokio::test]
async fn test_initiate_requires_authentication() {
    let app = setup_test_app().await;
    let client = app.client();

    let body = serde_json::json!({
        "filename": "holiday.png",
        "contentType": "image/png",
        "sizeBytes": 2048,
    });

    let missing = client.post(&api_path("/uploads")).json(&body).await;
    assert_eq!(missing.status_code(), 401);
    let missing_body: serde_json::Value = missing.json();
    assert_eq!(missing_body["code"], "UNAUTHENTICATED");

    let unknown = client
        .post(&api_path("/uploads"))
        .add_header("Authorization", "Bearer not-a-real-key")
        .json(&body)
        .await;
    assert_eq!(unknown.status_code(), 401);
}

#[tokio::test]
async fn test_initiate_rejects_invalid_requests() {
    let app = setup_test_app().await;
    let client = app.client();

    let cases = vec![
        // Whitespace-only filename
        serde_json::json!({
            "filename": "   ",
            "contentType": "image/png",
            "sizeBytes": 2048,
        }),
        // Declared size above the configured 10 MiB maximum
        serde_json::json!({
            "filename": "big.png",
            "contentType": "image/png",
            "sizeBytes": 11 * 1024 * 1024,
        }),
        // Content type outside the allow-list
        serde_json::json!({
            "filename": "clip.mp4",
            "contentType": "video/mp4",
            "sizeBytes": 2048,
        }),
        // Joining and creating a batch at the same time
        serde_json::json!({
            "filename": "a.png",
            "contentType": "image/png",
            "sizeBytes": 2048,
            "batchId": Uuid::new_v4(),
            "batchTotal": 3,
        }),
    ];

    for case in cases {
        let response = client
            .post(&api_path("/uploads"))
            .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
            .json(&case)
            .await;

        assert_eq!(
            response.status_code(),
            400,
            "Request should be rejected: {}",
            case
        );
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "VALIDATION_FAILED");
    }
}

#[tokio::test]
async fn test_initiate_with_batch_total_creates_batch() {
    let app = setup_test_app().await;
    let client = app.client();

    let first = client
        .post(&api_path("/uploads"))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({
            "filename": "one.png",
            "contentType": "image/png",
            "sizeBytes": 2048,
            "batchTotal": 2,
        }))
        .await;

    assert_eq!(first.status_code(), 201);
    let first_body: serde_json::Value = first.json();
    let batch_id = first_body["batchId"]
        .as_str()
        .expect("Expected 'batchId' when batchTotal is given");

    let batch_response = client
        .get(&api_path(&format!("/batches/{}", batch_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;

    assert_eq!(batch_response.status_code(), 200);
    let batch_body: serde_json::Value = batch_response.json();
    assert_eq!(batch_body["totalFiles"], 2);
    assert_eq!(batch_body["completedFiles"], 0);

    // The second file joins the batch created by the first.
    let second = client
        .post(&api_path("/uploads"))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({
            "filename": "two.png",
            "contentType": "image/png",
            "sizeBytes": 2048,
            "batchId": batch_id,
        }))
        .await;

    assert_eq!(second.status_code(), 201);
    let second_body: serde_json::Value = second.json();
    assert_eq!(second_body["batchId"].as_str(), Some(batch_id));
}

#[tokio::test]
async fn test_joining_foreign_batch_is_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let first = client
        .post(&api_path("/uploads"))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({
            "filename": "one.png",
            "contentType": "image/png",
            "sizeBytes": 2048,
            "batchTotal": 2,
        }))
        .await;
    let first_body: serde_json::Value = first.json();
    let batch_id = first_body["batchId"].as_str().expect("Expected 'batchId'");

    // Another owner's batch id behaves exactly like an unknown one.
    let response = client
        .post(&api_path("/uploads"))
        .add_header("Authorization", format!("Bearer {}", OWNER_B_KEY))
        .json(&serde_json::json!({
            "filename": "b.png",
            "contentType": "image/png",
            "sizeBytes": 2048,
            "batchId": batch_id,
        }))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_initiate_mint_failure_keeps_pending_record() {
    let app = setup_test_app().await;
    let client = app.client();

    app.storage.set_fail_mints(true);
    let response = client
        .post(&api_path("/uploads"))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({
            "filename": "holiday.png",
            "contentType": "image/png",
            "sizeBytes": 2048,
        }))
        .await;

    assert_eq!(response.status_code(), 502);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_UNAVAILABLE");
    assert_eq!(body["message"], "Failed to access object storage");

    // The record was persisted before the mint was attempted; it shows up
    // as pending once storage recovers.
    app.storage.set_fail_mints(false);
    let list_response = client
        .get(&api_path("/files"))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;

    assert_eq!(list_response.status_code(), 200);
    let files: serde_json::Value = list_response.json();
    let files = files.as_array().expect("Expected an array of files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["status"], "pending");
}

#[tokio::test]
async fn test_start_upload_is_idempotent() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &[]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    for _ in 0..2 {
        let response = client
            .post(&api_path(&format!("/uploads/{}/start", file_id)))
            .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
            .await;

        assert_eq!(response.status_code(), 200);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "uploading");
    }
}

#[tokio::test]
async fn test_complete_upload_lifecycle() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = upload_completed_file(&app, OWNER_A_KEY, "holiday.png", &[]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let status_response = client
        .get(&api_path(&format!("/uploads/{}/status", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;

    assert_eq!(status_response.status_code(), 200);
    let body: serde_json::Value = status_response.json();
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn test_pending_upload_can_complete_directly() {
    let app = setup_test_app().await;
    let client = app.client();

    // A client that never reports progress can still report completion.
    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &[]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let response = client
        .post(&api_path(&format!("/uploads/{}/complete", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn test_terminal_states_reject_further_reports() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = upload_completed_file(&app, OWNER_A_KEY, "holiday.png", &[]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let complete_again = client
        .post(&api_path(&format!("/uploads/{}/complete", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;
    assert_eq!(complete_again.status_code(), 409);
    let body: serde_json::Value = complete_again.json();
    assert_eq!(body["code"], "INVALID_STATE_TRANSITION");

    let fail_after = client
        .post(&api_path(&format!("/uploads/{}/fail", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({"errorMessage": "too late"}))
        .await;
    assert_eq!(fail_after.status_code(), 409);

    let start_after = client
        .post(&api_path(&format!("/uploads/{}/start", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;
    assert_eq!(start_after.status_code(), 409);
}

#[tokio::test]
async fn test_fail_upload_records_reason() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &[]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let response = client
        .post(&api_path(&format!("/uploads/{}/fail", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({"errorMessage": "network reset during PUT"}))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["errorMessage"], "network reset during PUT");

    let status_response = client
        .get(&api_path(&format!("/uploads/{}/status", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;
    let status_body: serde_json::Value = status_response.json();
    assert_eq!(status_body["status"], "failed");
    assert_eq!(status_body["errorMessage"], "network reset during PUT");
}

#[tokio::test]
async fn test_fail_upload_without_reason() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &[]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let response = client
        .post(&api_path(&format!("/uploads/{}/fail", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .json(&serde_json::json!({}))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "failed");
    assert!(body.get("errorMessage").is_none());
}

/// Progress reports on another owner's file are rejected outright, while
/// status reads mask the file's existence.
#[tokio::test]
async fn test_upload_commands_require_ownership() {
    let app = setup_test_app().await;
    let client = app.client();

    let file = initiate_upload(client, OWNER_A_KEY, "holiday.png", &[]).await;
    let file_id = file["fileId"].as_str().expect("Expected 'fileId'");

    let start = client
        .post(&api_path(&format!("/uploads/{}/start", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_B_KEY))
        .await;
    assert_eq!(start.status_code(), 403);
    let start_body: serde_json::Value = start.json();
    assert_eq!(start_body["code"], "NOT_AUTHORIZED");

    let complete = client
        .post(&api_path(&format!("/uploads/{}/complete", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_B_KEY))
        .await;
    assert_eq!(complete.status_code(), 403);

    let fail = client
        .post(&api_path(&format!("/uploads/{}/fail", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_B_KEY))
        .json(&serde_json::json!({}))
        .await;
    assert_eq!(fail.status_code(), 403);

    let status = client
        .get(&api_path(&format!("/uploads/{}/status", file_id)))
        .add_header("Authorization", format!("Bearer {}", OWNER_B_KEY))
        .await;
    assert_eq!(
        status.status_code(),
        404,
        "Status reads should not reveal another owner's file"
    );
}

#[tokio::test]
async fn test_status_unknown_file_is_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .get(&api_path(&format!("/uploads/{}/status", Uuid::new_v4())))
        .add_header("Authorization", format!("Bearer {}", OWNER_A_KEY))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}
