//! Upload request validation
//!
//! Provides validation for upload initiation:
//! - Filename: non-empty after trimming, bounded length
//! - Declared size: at least one byte, within the configured maximum
//! - Content type: member of the configured image allow-list
//! - Batch selector: join an existing batch or create one, never both

use uuid::Uuid;

use crate::error::AppError;

/// Maximum length for original filenames (255 characters)
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Validate an original filename
///
/// Rules:
/// - Must not be empty or whitespace-only
/// - Maximum 255 characters
pub fn validate_filename(filename: &str) -> Result<(), AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::Validation(
            "Filename cannot be empty".to_string(),
        ));
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Filename exceeds maximum length of {} characters",
            MAX_FILENAME_LENGTH
        )));
    }

    Ok(())
}

/// Validate a declared file size against the configured maximum
pub fn validate_file_size(size_bytes: u64, max_bytes: u64) -> Result<(), AppError> {
    if size_bytes == 0 {
        return Err(AppError::Validation(
            "File size must be at least 1 byte".to_string(),
        ));
    }

    if size_bytes > max_bytes {
        return Err(AppError::Validation(format!(
            "File size {} bytes exceeds the maximum of {} bytes",
            size_bytes, max_bytes
        )));
    }

    Ok(())
}

/// Validate a declared content type against the configured image allow-list.
/// Comparison is case-insensitive; the allow-list is stored lower-cased.
pub fn validate_content_type(content_type: &str, allowed: &[String]) -> Result<(), AppError> {
    let normalized = content_type.trim().to_lowercase();
    if !allowed.iter().any(|a| a == &normalized) {
        return Err(AppError::Validation(format!(
            "Content type '{}' is not an allowed image type",
            content_type
        )));
    }

    Ok(())
}

/// Validate the batch selector on an initiate request.
///
/// Rules:
/// - `batch_id` and `batch_total` are mutually exclusive
/// - `batch_total`, when present, must be at least 1
pub fn validate_batch_selector(
    batch_id: Option<Uuid>,
    batch_total: Option<i32>,
) -> Result<(), AppError> {
    if batch_id.is_some() && batch_total.is_some() {
        return Err(AppError::Validation(
            "Provide either batchId or batchTotal, not both".to_string(),
        ));
    }

    if let Some(total) = batch_total {
        if total < 1 {
            return Err(AppError::Validation(
                "Batch total must be at least 1".to_string(),
            ));
        }
    }

    Ok(())
}
