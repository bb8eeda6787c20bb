use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Grouping of files uploaded together, tracking aggregate completion.
///
/// The completed count only ever grows, is bounded by the total, and is
/// incremented atomically by the catalog when a member file completes.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadBatch {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub total_files: i32,
    pub completed_files: i32,
    pub created_at: DateTime<Utc>,
}

impl UploadBatch {
    pub fn create(owner_id: Uuid, total_files: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            total_files,
            completed_files: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_files >= self.total_files
    }
}

/// Wire representation of a batch
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchView {
    pub id: Uuid,
    pub total_files: i32,
    pub completed_files: i32,
    pub created_at: DateTime<Utc>,
}

impl From<UploadBatch> for BatchView {
    fn from(batch: UploadBatch) -> Self {
        Self {
            id: batch.id,
            total_files: batch.total_files,
            completed_files: batch.completed_files,
            created_at: batch.created_at,
        }
    }
}
