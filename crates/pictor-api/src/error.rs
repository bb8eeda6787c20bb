//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors and `?` so they
//! become `HttpAppError` and render consistently (status, body, logging).

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pictor_core::{AppError, ErrorMetadata, LogLevel};
use pictor_storage::StorageError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire shape of every error body: a stable machine-readable code plus a
/// human-readable message. Sensitive variants already collapse to generic
/// messages in `client_message`, so nothing internal leaks through here.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Human-readable description of what went wrong
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from pictor-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on
/// deserialization failure. Use this instead of `Json<T>` so malformed bodies
/// share the API error shape.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code = error_code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code = error_code, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code = error_code, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            code: app_error.error_code().to_string(),
            message: app_error.client_message(),
        });

        (status, body).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::PresignFailed(msg) => AppError::Storage(msg),
            StorageError::DeleteFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::ConfigError(msg) => AppError::Configuration(msg),
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("Object not found".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "Object not found"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_presign_failed() {
        let storage_err = StorageError::PresignFailed("signing request rejected".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::Storage(msg) => assert_eq!(msg, "signing request rejected"),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_storage_error_config() {
        let storage_err = StorageError::ConfigError("missing bucket".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::Configuration(msg) => assert_eq!(msg, "missing bucket"),
            _ => panic!("Expected Configuration variant"),
        }
    }

    /// Verifies the public error contract: the serialized body carries exactly
    /// "code" and "message".
    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse::new("NOT_FOUND", "File not found");
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json.get("code").and_then(|v| v.as_str()), Some("NOT_FOUND"));
        assert_eq!(
            json.get("message").and_then(|v| v.as_str()),
            Some("File not found")
        );
        assert_eq!(json.as_object().map(|o| o.len()), Some(2));
    }

    /// Storage failures must not leak backend detail to clients.
    #[test]
    fn test_storage_errors_render_with_generic_message() {
        let err = HttpAppError(AppError::Storage(
            "aws sdk: credentials chain exhausted".to_string(),
        ));
        let app_error = &err.0;
        assert_eq!(app_error.http_status_code(), 502);
        assert_eq!(app_error.client_message(), "Failed to access object storage");
    }
}
