//! Catalog crate for pictor
//!
//! Persists file and batch metadata behind blocking store traits and exposes
//! them to async callers through a bounded worker-pool bridge.

pub mod bridge;
pub mod catalog;
pub mod memory;
pub mod postgres;
pub mod schema;
pub mod store;

pub use bridge::CatalogBridge;
pub use catalog::Catalog;
pub use memory::{MemoryBatchStore, MemoryFileStore};
pub use postgres::{build_pool, run_migrations, PgBatchStore, PgFileStore, PgPool};
pub use store::{BatchStore, FileStore};
