//! Pictor Storage Library
//!
//! Object storage adapters for Pictor. File bytes never transit the
//! application server: the adapter's whole job is to mint time-limited
//! presigned grants for direct client access and to delete objects by key.
//!
//! Two backends are provided: [`S3Storage`] presigns against S3 or any
//! S3-compatible endpoint, and [`MemoryStorage`] fabricates grants for
//! tests and local development.

pub mod memory;
pub mod s3;
pub mod traits;

pub use memory::MemoryStorage;
pub use s3::S3Storage;
pub use traits::{Grant, ObjectStorage, StorageError, StorageResult};
