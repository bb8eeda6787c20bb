//! Pictor Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all Pictor components.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, StorageBackendKind};
pub use error::{AppError, ErrorMetadata, LogLevel};
