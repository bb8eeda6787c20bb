//! Async facade over the blocking stores

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pictor_core::models::{FileRecord, SortField, UploadBatch};
use pictor_core::AppError;
use uuid::Uuid;

use crate::bridge::CatalogBridge;
use crate::store::{BatchStore, FileStore};

/// Async catalog API used by the HTTP handlers.
///
/// Every call crosses the worker-pool bridge, so results come back as fully
/// owned records.
#[derive(Clone)]
pub struct Catalog {
    files: Arc<dyn FileStore>,
    batches: Arc<dyn BatchStore>,
    bridge: CatalogBridge,
}

impl Catalog {
    pub fn new(
        files: Arc<dyn FileStore>,
        batches: Arc<dyn BatchStore>,
        bridge: CatalogBridge,
    ) -> Self {
        Self {
            files,
            batches,
            bridge,
        }
    }

    /// Probe catalog connectivity through the worker pool
    pub async fn ping(&self) -> Result<(), AppError> {
        let files = self.files.clone();
        self.bridge.run(move || files.ping()).await
    }

    /// Persist a file record, handing it back to the caller
    pub async fn save_file(&self, record: FileRecord) -> Result<FileRecord, AppError> {
        let files = self.files.clone();
        self.bridge
            .run(move || {
                files.save(&record)?;
                Ok(record)
            })
            .await
    }

    pub async fn find_file(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let files = self.files.clone();
        self.bridge.run(move || files.find_by_id(id)).await
    }

    /// Page through an owner's files, with AND-semantics tag filtering when
    /// the filter set is non-empty
    pub async fn list_files(
        &self,
        owner_id: Uuid,
        tags: Vec<String>,
        page: i64,
        size: i64,
        sort: SortField,
    ) -> Result<Vec<FileRecord>, AppError> {
        let files = self.files.clone();
        self.bridge
            .run(move || {
                if tags.is_empty() {
                    files.find_by_owner_paged(owner_id, page, size, sort)
                } else {
                    files.find_by_owner_and_tags_paged(owner_id, &tags, page, size, sort)
                }
            })
            .await
    }

    pub async fn delete_file(&self, id: Uuid) -> Result<bool, AppError> {
        let files = self.files.clone();
        self.bridge.run(move || files.delete_by_id(id)).await
    }

    /// Remove pending records older than the cutoff, returning the count
    pub async fn delete_stale_pending(&self, older_than: DateTime<Utc>) -> Result<u64, AppError> {
        let files = self.files.clone();
        let removed = self
            .bridge
            .run(move || files.delete_stale_pending(older_than))
            .await?;

        if removed > 0 {
            tracing::info!(removed, "Removed stale pending uploads");
        }

        Ok(removed)
    }

    pub async fn save_batch(&self, batch: UploadBatch) -> Result<UploadBatch, AppError> {
        let batches = self.batches.clone();
        self.bridge
            .run(move || {
                batches.save(&batch)?;
                Ok(batch)
            })
            .await
    }

    pub async fn find_batch(&self, id: Uuid) -> Result<Option<UploadBatch>, AppError> {
        let batches = self.batches.clone();
        self.bridge.run(move || batches.find_by_id(id)).await
    }

    /// Bounded increment of a batch's completed counter
    pub async fn increment_batch_completed(
        &self,
        id: Uuid,
    ) -> Result<Option<UploadBatch>, AppError> {
        let batches = self.batches.clone();
        self.bridge
            .run(move || batches.increment_completed(id))
            .await
    }
}
