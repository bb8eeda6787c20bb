//! API constants
//!
//! This module defines constants used throughout the API, including the
//! versioned path prefix shared by routes and the OpenAPI spec.

/// API base path prefix including the version segment
pub const API_PREFIX: &str = "/api/v0";

/// Maximum accepted request body size in bytes.
///
/// Every endpoint carries metadata only; file bytes travel directly to
/// object storage via granted URLs and never pass through this server.
pub const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;
