//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends
//! must implement.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A time-limited authorization for one direct operation against a specific
/// storage key. The expiration is enforced by the storage service itself;
/// grants are minted fresh per response and never cached.
#[derive(Debug, Clone)]
pub struct Grant {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Object storage abstraction
///
/// Backends issue short-lived write/read grants for a storage key and delete
/// objects by key. Nothing here moves bytes; clients talk to the storage
/// service directly using the granted URLs.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Mint a grant allowing one direct PUT of `content_type` bytes to
    /// `storage_key`, valid for `ttl`.
    async fn mint_write_grant(
        &self,
        storage_key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> StorageResult<Grant>;

    /// Mint a grant allowing direct GETs of `storage_key`, valid for `ttl`.
    async fn mint_read_grant(&self, storage_key: &str, ttl: Duration) -> StorageResult<Grant>;

    /// Delete the object stored under `storage_key`.
    async fn delete_object(&self, storage_key: &str) -> StorageResult<()>;
}

/// Grant expiration as a wall-clock instant for the given ttl.
pub(crate) fn expires_at_for(ttl: Duration) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::seconds(ttl.as_secs() as i64)
}
