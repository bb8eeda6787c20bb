//! In-memory ObjectStorage implementation for testing

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::traits::{expires_at_for, Grant, ObjectStorage, StorageError, StorageResult};

/// Memory-backed storage that hands out fabricated grant URLs.
///
/// Presigning never touches the backing store, so grants are minted whether
/// or not the key holds an object. The object set records which keys a
/// simulated client has uploaded against a write grant.
pub struct MemoryStorage {
    objects: Arc<Mutex<HashSet<String>>>,
    fail_mints: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashSet::new())),
            fail_mints: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Simulate a client uploading against a write grant
    pub fn put_object(&self, key: &str) {
        self.objects.lock().unwrap().insert(key.to_string());
    }

    /// Check if an object exists under the given key
    pub fn has_object(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains(key)
    }

    /// Remove an object without going through delete_object
    pub fn remove_object(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    /// Make subsequent grant mints fail
    pub fn set_fail_mints(&self, fail: bool) {
        self.fail_mints.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent deletes fail
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn mint_write_grant(
        &self,
        storage_key: &str,
        _content_type: &str,
        ttl: Duration,
    ) -> StorageResult<Grant> {
        if self.fail_mints.load(Ordering::SeqCst) {
            return Err(StorageError::PresignFailed(
                "simulated presign failure".to_string(),
            ));
        }
        Ok(Grant {
            url: format!("https://example.com/write/{}", storage_key),
            expires_at: expires_at_for(ttl),
        })
    }

    async fn mint_read_grant(&self, storage_key: &str, ttl: Duration) -> StorageResult<Grant> {
        if self.fail_mints.load(Ordering::SeqCst) {
            return Err(StorageError::PresignFailed(
                "simulated presign failure".to_string(),
            ));
        }
        Ok(Grant {
            url: format!("https://example.com/read/{}", storage_key),
            expires_at: expires_at_for(ttl),
        })
    }

    async fn delete_object(&self, storage_key: &str) -> StorageResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed(
                "simulated delete failure".to_string(),
            ));
        }
        if !self.objects.lock().unwrap().remove(storage_key) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(())
    }
}
