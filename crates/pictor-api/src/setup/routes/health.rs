//! Health check handlers and response types.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub catalog: String,
    pub storage: String,
}

/// Liveness probe - simple check that process is running
/// Always returns 200 if process can respond
pub async fn liveness_check(_state: Arc<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive"
        })),
    )
}

/// Readiness probe - checks if service can accept traffic
/// Checks critical dependencies (catalog database)
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let mut response = serde_json::json!({
        "status": "ready",
        "catalog": "unknown"
    });

    let mut overall_ready = true;
    match tokio::time::timeout(TIMEOUT, state.catalog.ping()).await {
        Ok(Ok(())) => response["catalog"] = serde_json::json!("ready"),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Catalog readiness check failed");
            response["catalog"] = serde_json::json!(format!("not_ready: {}", e));
            overall_ready = false;
        }
        Err(_) => {
            tracing::error!("Catalog readiness check timed out");
            response["catalog"] = serde_json::json!("timeout");
            overall_ready = false;
        }
    }

    if !overall_ready {
        response["status"] = serde_json::json!("not_ready");
    }

    let status_code = if overall_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

/// Full health check (catalog database and object storage).
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let mut response = HealthCheckResponse {
        status: "healthy".to_string(),
        catalog: "unknown".to_string(),
        storage: "unknown".to_string(),
    };

    response.catalog = run_check(TIMEOUT, state.catalog.ping(), "unhealthy").await;
    let overall_healthy = response.catalog == "healthy";

    // Minting a grant against a throwaway key exercises credentials and
    // connectivity without touching real objects. Storage trouble is
    // reported but does not fail the probe.
    let storage = state.storage.clone();
    response.storage = run_check(
        TIMEOUT,
        async move {
            storage
                .mint_read_grant("health-check-non-existent-key", Duration::from_secs(60))
                .await
                .map(drop)
        },
        "degraded",
    )
    .await;

    if !overall_healthy {
        response.status = "unhealthy".to_string();
    }

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
