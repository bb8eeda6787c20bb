//! Blocking store traits for file and batch metadata
//!
//! Implementations run synchronous database calls and must only be invoked
//! through [`crate::CatalogBridge`] from async code.

use chrono::{DateTime, Utc};
use pictor_core::models::{FileRecord, SortField, UploadBatch};
use pictor_core::AppError;
use uuid::Uuid;

/// Store for file metadata records
pub trait FileStore: Send + Sync {
    /// Cheap connectivity probe for readiness checks
    fn ping(&self) -> Result<(), AppError>;

    /// Insert or update a file record
    fn save(&self, record: &FileRecord) -> Result<(), AppError>;

    /// Get a file record by id
    fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError>;

    /// Page through an owner's files, ordered by the sort field descending
    /// with file id descending as tiebreaker
    fn find_by_owner_paged(
        &self,
        owner_id: Uuid,
        page: i64,
        size: i64,
        sort: SortField,
    ) -> Result<Vec<FileRecord>, AppError>;

    /// Page through an owner's files whose tag set contains every filter tag
    fn find_by_owner_and_tags_paged(
        &self,
        owner_id: Uuid,
        tags: &[String],
        page: i64,
        size: i64,
        sort: SortField,
    ) -> Result<Vec<FileRecord>, AppError>;

    /// Delete a file record, returning whether a record existed
    fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError>;

    /// Delete pending records initiated before the cutoff, returning the count
    fn delete_stale_pending(&self, older_than: DateTime<Utc>) -> Result<u64, AppError>;
}

/// Store for upload batch records
pub trait BatchStore: Send + Sync {
    /// Insert or update a batch record
    fn save(&self, batch: &UploadBatch) -> Result<(), AppError>;

    /// Get a batch record by id
    fn find_by_id(&self, id: Uuid) -> Result<Option<UploadBatch>, AppError>;

    /// Increment the completed counter if it is below the total.
    ///
    /// Returns the updated batch, or None when the batch does not exist or
    /// the counter is already at the total.
    fn increment_completed(&self, id: Uuid) -> Result<Option<UploadBatch>, AppError>;
}
