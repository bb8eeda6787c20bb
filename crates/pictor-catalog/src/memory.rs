//! In-memory FileStore and BatchStore implementations for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use pictor_core::models::{FileRecord, FileStatus, SortField, UploadBatch};
use pictor_core::AppError;
use uuid::Uuid;

use crate::store::{BatchStore, FileStore};

/// Memory-backed FileStore mirroring the paging and filter semantics of the
/// PostgreSQL implementation
pub struct MemoryFileStore {
    records: Arc<Mutex<HashMap<Uuid, FileRecord>>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored records (for test assertions)
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl Default for MemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_records(records: &mut [FileRecord], sort: SortField) {
    match sort {
        SortField::UploadDate => records.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.id.cmp(&a.id))
        }),
        SortField::Filename => records.sort_by(|a, b| {
            b.original_filename
                .cmp(&a.original_filename)
                .then_with(|| b.id.cmp(&a.id))
        }),
    }
}

fn page_slice(mut records: Vec<FileRecord>, page: i64, size: i64, sort: SortField) -> Vec<FileRecord> {
    sort_records(&mut records, sort);
    records
        .into_iter()
        .skip(page.saturating_mul(size) as usize)
        .take(size as usize)
        .collect()
}

impl FileStore for MemoryFileStore {
    fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn save(&self, record: &FileRecord) -> Result<(), AppError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    fn find_by_owner_paged(
        &self,
        owner_id: Uuid,
        page: i64,
        size: i64,
        sort: SortField,
    ) -> Result<Vec<FileRecord>, AppError> {
        let records: Vec<FileRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();

        Ok(page_slice(records, page, size, sort))
    }

    fn find_by_owner_and_tags_paged(
        &self,
        owner_id: Uuid,
        tags: &[String],
        page: i64,
        size: i64,
        sort: SortField,
    ) -> Result<Vec<FileRecord>, AppError> {
        let records: Vec<FileRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id)
            .filter(|r| tags.iter().all(|tag| r.tags.contains(tag)))
            .cloned()
            .collect();

        Ok(page_slice(records, page, size, sort))
    }

    fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.records.lock().unwrap().remove(&id).is_some())
    }

    fn delete_stale_pending(&self, older_than: DateTime<Utc>) -> Result<u64, AppError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, r| !(r.status == FileStatus::Pending && r.uploaded_at < older_than));
        Ok((before - records.len()) as u64)
    }
}

/// Memory-backed BatchStore
pub struct MemoryBatchStore {
    batches: Arc<Mutex<HashMap<Uuid, UploadBatch>>>,
    fail_increments: AtomicBool,
}

impl MemoryBatchStore {
    pub fn new() -> Self {
        Self {
            batches: Arc::new(Mutex::new(HashMap::new())),
            fail_increments: AtomicBool::new(false),
        }
    }

    /// Make subsequent counter increments fail
    pub fn set_fail_increments(&self, fail: bool) {
        self.fail_increments.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemoryBatchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchStore for MemoryBatchStore {
    fn save(&self, batch: &UploadBatch) -> Result<(), AppError> {
        self.batches.lock().unwrap().insert(batch.id, batch.clone());
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<UploadBatch>, AppError> {
        Ok(self.batches.lock().unwrap().get(&id).cloned())
    }

    fn increment_completed(&self, id: Uuid) -> Result<Option<UploadBatch>, AppError> {
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(AppError::Catalog("simulated counter failure".to_string()));
        }
        let mut batches = self.batches.lock().unwrap();
        match batches.get_mut(&id) {
            Some(batch) if batch.completed_files < batch.total_files => {
                batch.completed_files += 1;
                Ok(Some(batch.clone()))
            }
            _ => Ok(None),
        }
    }
}
