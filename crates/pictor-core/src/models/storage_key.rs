//! Storage key derivation.
//!
//! Keys are assigned once at file creation and never mutated. The layout is
//! `uploads/{owner}/{yyyy}/{mm}/{file_id}/{filename}`: the owner segment
//! scopes keys per identity, the time partition keeps listings of the raw
//! bucket manageable, and the file id segment guarantees uniqueness even for
//! the same owner uploading the same filename in the same second.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

/// Upper bound for the sanitized filename segment of a storage key.
pub const MAX_KEY_FILENAME_LENGTH: usize = 120;

const FALLBACK_FILENAME: &str = "file";

/// Reduce an original filename to a storage-safe key segment.
///
/// Only the final path component survives, so traversal sequences and
/// client-side directory names never reach the bucket. Characters outside
/// `[A-Za-z0-9._-]` become `-`.
pub fn sanitize_filename(original: &str) -> String {
    let basename = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let sanitized: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let sanitized = sanitized.trim_matches(['.', '-']).to_string();
    if sanitized.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    sanitized.chars().take(MAX_KEY_FILENAME_LENGTH).collect()
}

/// Derive the immutable storage key for a file.
pub fn derive_storage_key(
    owner_id: Uuid,
    uploaded_at: DateTime<Utc>,
    file_id: Uuid,
    original_filename: &str,
) -> String {
    format!(
        "uploads/{}/{:04}/{:02}/{}/{}",
        owner_id,
        uploaded_at.year(),
        uploaded_at.month(),
        file_id,
        sanitize_filename(original_filename)
    )
}
