use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::storage_key::derive_storage_key;
use crate::models::tags::normalize_tags;

/// Upload lifecycle state of a file.
///
/// `pending` is the only legal initial state; `completed` and `failed` are
/// terminal and can never be left again. A re-upload creates a new file
/// record instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
}

impl FileStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Completed | FileStatus::Failed)
    }

    pub fn can_transition_to(&self, next: FileStatus) -> bool {
        matches!(
            (self, next),
            (FileStatus::Pending, FileStatus::Uploading)
                | (FileStatus::Pending, FileStatus::Completed)
                | (FileStatus::Pending, FileStatus::Failed)
                | (FileStatus::Uploading, FileStatus::Completed)
                | (FileStatus::Uploading, FileStatus::Failed)
        )
    }
}

impl Display for FileStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FileStatus::Pending => write!(f, "pending"),
            FileStatus::Uploading => write!(f, "uploading"),
            FileStatus::Completed => write!(f, "completed"),
            FileStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for FileStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FileStatus::Pending),
            "uploading" => Ok(FileStatus::Uploading),
            "completed" => Ok(FileStatus::Completed),
            "failed" => Ok(FileStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid file status: {}", s)),
        }
    }
}

/// One user-owned uploaded asset's metadata record.
///
/// Owner and storage key are assigned at creation and never change. The
/// record is request-scoped: handlers load it fresh from the catalog and
/// discard it after the response.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub original_filename: String,
    pub storage_key: String,
    pub uploaded_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub status: FileStatus,
    pub error_message: Option<String>,
}

impl FileRecord {
    /// Create a new `pending` record with a fresh id and a storage key
    /// derived from the owner, the upload time partition, and that id.
    pub fn create<S: AsRef<str>>(
        owner_id: Uuid,
        batch_id: Option<Uuid>,
        original_filename: &str,
        tags: &[S],
    ) -> Self {
        let id = Uuid::new_v4();
        let uploaded_at = Utc::now();
        let storage_key = derive_storage_key(owner_id, uploaded_at, id, original_filename);
        Self {
            id,
            owner_id,
            batch_id,
            original_filename: original_filename.to_string(),
            storage_key,
            uploaded_at,
            tags: normalize_tags(tags),
            status: FileStatus::Pending,
            error_message: None,
        }
    }

    /// Move the record to `next`, rejecting transitions out of terminal
    /// states and any other edge the lifecycle does not allow.
    pub fn transition(
        &mut self,
        next: FileStatus,
        error_message: Option<String>,
    ) -> Result<(), AppError> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        if next == FileStatus::Failed {
            self.error_message = error_message;
        }
        Ok(())
    }
}

/// Sort fields accepted by the file listing.
///
/// Request-supplied names resolve through this enum so no raw string ever
/// reaches the query builder; unknown names fall back to the upload date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    UploadDate,
    Filename,
}

impl SortField {
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("filename") => SortField::Filename,
            Some("uploadDate") => SortField::UploadDate,
            _ => SortField::UploadDate,
        }
    }
}

/// Wire representation of a file, annotated with a freshly minted read
/// grant. Grants are never cached; a new one is minted per response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    pub id: Uuid,
    pub filename: String,
    pub storage_key: String,
    pub upload_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub status: FileStatus,
    pub download_url: String,
}

impl FileView {
    pub fn new(record: FileRecord, download_url: String) -> Self {
        Self {
            id: record.id,
            filename: record.original_filename,
            storage_key: record.storage_key,
            upload_date: record.uploaded_at,
            tags: record.tags,
            status: record.status,
            download_url,
        }
    }
}
