//! Health probe and API documentation endpoint tests.
//!
//! Run with: `cargo test -p pictor-api --test health_test`

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_liveness_probe() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/health/live").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/health/ready").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["catalog"], "ready");
}

#[tokio::test]
async fn test_health_reports_all_dependencies() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

/// Storage trouble degrades the health report without failing the probe;
/// the catalog alone decides the overall status.
#[tokio::test]
async fn test_health_reports_storage_degradation() {
    let app = setup_test_app().await;
    let client = app.client();

    app.storage.set_fail_mints(true);
    let response = client.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["storage"]
        .as_str()
        .expect("Expected 'storage' status string")
        .starts_with("degraded"));
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["openapi"].is_string());
    assert!(body["paths"]["/api/v0/uploads"].is_object());
    assert!(body["paths"]["/api/v0/files/{id}/tags"].is_object());
}

#[tokio::test]
async fn test_docs_ui_is_served() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/docs").await;

    assert_eq!(response.status_code(), 200);
}
