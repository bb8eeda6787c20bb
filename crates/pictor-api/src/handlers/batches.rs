//! Upload batch query handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use pictor_core::models::BatchView;
use pictor_core::AppError;
use uuid::Uuid;

use crate::auth::models::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v0/batches/{id}",
    tag = "batches",
    params(
        ("id" = Uuid, Path, description = "Batch ID")
    ),
    responses(
        (status = 200, description = "Batch found", body = BatchView),
        (status = 404, description = "Batch not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(owner_id = %ctx.owner_id, batch_id = %id, operation = "get_batch")
)]
pub async fn get_batch(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let batch = state
        .catalog
        .find_batch(id)
        .await?
        .filter(|b| b.owner_id == ctx.owner_id)
        .ok_or_else(|| AppError::NotFound("Batch not found".to_string()))?;

    Ok(Json(BatchView::from(batch)))
}
