use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use pictor_core::AppError;

use crate::auth::models::OwnerContext;
use crate::auth::verifier::IdentityVerifier;
use crate::error::HttpAppError;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn IdentityVerifier>,
}

/// Authenticate the request with a `Bearer` API key.
///
/// On success the resolved [`OwnerContext`] is inserted into the request
/// extensions for handlers to extract; every failure renders as 401 with
/// the standard error body.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthenticated(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    if !auth_header.starts_with("Bearer ") {
        return HttpAppError(AppError::Unauthenticated(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    match auth_state.verifier.verify(token) {
        Some(owner_id) => {
            request.extensions_mut().insert(OwnerContext { owner_id });
            next.run(request).await
        }
        None => {
            tracing::debug!("Rejected request with unknown API key");
            HttpAppError(AppError::Unauthenticated("Invalid API key".to_string()))
                .into_response()
        }
    }
}
