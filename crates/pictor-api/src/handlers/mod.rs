//! HTTP request handlers, one module per resource.

pub mod batches;
pub mod files;
pub mod tags;
pub mod uploads;
