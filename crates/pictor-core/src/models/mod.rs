//! Data models for the application
//!
//! This module contains the catalog domain types and the request/response
//! models carried over the wire, organized by feature area.

mod batch;
mod file;
mod tags;
mod upload;

pub mod storage_key;

// Re-export all models for convenient imports
pub use batch::*;
pub use file::*;
pub use tags::*;
pub use upload::*;

pub use storage_key::derive_storage_key;
