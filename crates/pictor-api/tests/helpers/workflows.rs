//! Workflow helpers for integration tests (initiate → put → complete, etc.).

#![allow(dead_code)]

use axum_test::TestServer;

use super::{api_path, TestApp};

/// Initiate an upload and assert it succeeds. Returns the 201 response body.
pub async fn initiate_upload(
    server: &TestServer,
    api_key: &str,
    filename: &str,
    tags: &[&str],
) -> serde_json::Value {
    let response = server
        .post(&api_path("/uploads"))
        .add_header("Authorization", format!("Bearer {}", api_key))
        .json(&serde_json::json!({
            "filename": filename,
            "contentType": "image/png",
            "sizeBytes": 1024,
            "tags": tags,
        }))
        .await;

    assert_eq!(
        response.status_code(),
        201,
        "Initiate should succeed for a valid request"
    );
    response.json()
}

/// Drive a file through the full client flow: initiate, simulate the PUT
/// against the write grant, then report progress and completion. Returns
/// the initiate response body (`fileId`, `s3Key`, ...).
pub async fn upload_completed_file(
    app: &TestApp,
    api_key: &str,
    filename: &str,
    tags: &[&str],
) -> serde_json::Value {
    let file = initiate_upload(&app.server, api_key, filename, tags).await;
    let file_id = file["fileId"]
        .as_str()
        .expect("Expected 'fileId' in initiate response");
    let s3_key = file["s3Key"]
        .as_str()
        .expect("Expected 's3Key' in initiate response");

    app.storage.put_object(s3_key);

    let start_response = app
        .server
        .post(&api_path(&format!("/uploads/{}/start", file_id)))
        .add_header("Authorization", format!("Bearer {}", api_key))
        .await;
    assert_eq!(start_response.status_code(), 200);

    let complete_response = app
        .server
        .post(&api_path(&format!("/uploads/{}/complete", file_id)))
        .add_header("Authorization", format!("Bearer {}", api_key))
        .await;
    assert_eq!(complete_response.status_code(), 200);

    file
}
