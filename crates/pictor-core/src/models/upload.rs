use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::FileStatus;

/// Request to initiate an upload and mint a presigned write URL
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InitiateUploadRequest {
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub filename: String,
    /// Content type (MIME type)
    #[validate(length(
        min = 1,
        max = 255,
        message = "Content type must be between 1 and 255 characters"
    ))]
    pub content_type: String,
    /// Declared file size in bytes
    #[validate(range(min = 1, message = "File size must be at least 1 byte"))]
    pub size_bytes: u64,
    /// Optional initial tags; normalized before storage
    #[serde(default)]
    pub tags: Vec<String>,
    /// Join an existing upload batch owned by the caller
    #[serde(default)]
    pub batch_id: Option<Uuid>,
    /// Create a new upload batch expecting this many files
    #[serde(default)]
    #[validate(range(min = 1, message = "Batch total must be at least 1"))]
    pub batch_total: Option<i32>,
}

/// Response containing the write grant for a direct upload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitiateUploadResponse {
    /// File ID (used to report completion or failure)
    pub file_id: Uuid,
    /// Presigned URL the client PUTs the bytes to
    pub write_url: String,
    /// Storage key where the file will live
    pub s3_key: String,
    /// Write grant expiration time
    pub expires_at: DateTime<Utc>,
    /// Batch the file belongs to, when one was created or joined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<Uuid>,
}

/// Request to report a failed upload
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportFailureRequest {
    /// Optional reason surfaced by the status endpoint
    #[serde(default)]
    #[validate(length(max = 1024, message = "Error message must be at most 1024 characters"))]
    pub error_message: Option<String>,
}

/// Current lifecycle state of an upload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatusResponse {
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Fresh read grant for a stored file
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    /// Presigned URL the client GETs the bytes from
    pub url: String,
    /// Read grant expiration time
    pub expires_at: DateTime<Utc>,
}
