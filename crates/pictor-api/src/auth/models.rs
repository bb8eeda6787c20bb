use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::HttpAppError;
use pictor_core::AppError;
use uuid::Uuid;

/// Authenticated owner extracted from the API key and stored in request
/// extensions by the auth middleware.
///
/// Every catalog query and mutation is scoped to this owner; no handler
/// ever sees another owner's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerContext {
    pub owner_id: Uuid,
}

impl<S> FromRequestParts<S> for OwnerContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<OwnerContext>().copied().ok_or_else(|| {
            HttpAppError(AppError::Unauthenticated(
                "Missing owner context".to_string(),
            ))
        })
    }
}
