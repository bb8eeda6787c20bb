use std::collections::BTreeSet;

use serde::Deserialize;
use utoipa::ToSchema;

/// Canonicalize a tag list: trim, lower-case, drop empties, deduplicate.
///
/// The same canonical form is applied before storage and before any filter
/// comparison, so filtering and storage always agree. The result is sorted,
/// which keeps persisted rows and equality checks deterministic.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Set operation applied to a file's tags by the tag mutation endpoint.
/// The HTTP verb selects the operation: POST adds, DELETE removes, PUT
/// replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOperation {
    Add,
    Remove,
    Replace,
}

impl TagOperation {
    /// Apply the operation to `current`, returning the new canonical set.
    ///
    /// A request that normalizes to an empty set is a no-op for every
    /// operation; the current tags come back unchanged.
    pub fn apply(&self, current: &[String], requested: &[String]) -> Vec<String> {
        let requested = normalize_tags(requested);
        if requested.is_empty() {
            return current.to_vec();
        }
        match self {
            TagOperation::Add => {
                let mut merged: BTreeSet<String> = current.iter().cloned().collect();
                merged.extend(requested);
                merged.into_iter().collect()
            }
            TagOperation::Remove => current
                .iter()
                .filter(|t| !requested.contains(t))
                .cloned()
                .collect(),
            TagOperation::Replace => requested,
        }
    }
}

/// Request body for every tag mutation verb. The field is mandatory; an
/// empty array is accepted and treated as a no-op after normalization.
#[derive(Debug, Deserialize, ToSchema, validator::Validate)]
pub struct TagMutationRequest {
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_trims_lowercases_and_dedupes() {
        let normalized = normalize_tags(&["  Beach ", "beach", "SUMMER", "", "   "]);
        assert_eq!(normalized, tags(&["beach", "summer"]));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_tags(&["Alpha", " beta "]);
        let twice = normalize_tags(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_add_is_a_union() {
        let current = tags(&["beach", "summer"]);
        let result = TagOperation::Add.apply(&current, &tags(&["Sunset", "beach"]));
        assert_eq!(result, tags(&["beach", "summer", "sunset"]));
    }

    #[test]
    fn test_add_existing_tag_leaves_set_unchanged() {
        let current = tags(&["beach"]);
        let result = TagOperation::Add.apply(&current, &tags(&[" BEACH "]));
        assert_eq!(result, current);
    }

    #[test]
    fn test_remove_is_a_difference() {
        let current = tags(&["beach", "summer", "sunset"]);
        let result = TagOperation::Remove.apply(&current, &tags(&["Summer", "missing"]));
        assert_eq!(result, tags(&["beach", "sunset"]));
    }

    #[test]
    fn test_replace_overwrites_with_normalized_form() {
        let current = tags(&["beach", "summer"]);
        let result = TagOperation::Replace.apply(&current, &tags(&[" Winter ", "SKI", "winter"]));
        assert_eq!(result, tags(&["ski", "winter"]));
    }

    #[test]
    fn test_empty_request_is_a_noop_for_every_operation() {
        let current = tags(&["beach", "summer"]);
        let blank = tags(&["", "   "]);
        for op in [TagOperation::Add, TagOperation::Remove, TagOperation::Replace] {
            assert_eq!(op.apply(&current, &[]), current, "{:?}", op);
            assert_eq!(op.apply(&current, &blank), current, "{:?}", op);
        }
    }
}
