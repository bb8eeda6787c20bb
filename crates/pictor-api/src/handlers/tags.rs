//! Tag mutation handlers. The HTTP verb selects the set operation applied
//! to the file's tags: POST adds, DELETE removes, PUT replaces.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use pictor_core::models::{normalize_tags, FileView, TagMutationRequest, TagOperation};
use pictor_core::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::auth::models::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::files::build_file_view;
use crate::handlers::uploads::load_owned_for_command;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v0/files/{id}/tags",
    tag = "tags",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = TagMutationRequest,
    responses(
        (status = 200, description = "Updated file view", body = FileView),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "File belongs to another owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "add_tags")
)]
pub async fn add_tags(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<TagMutationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    mutate_tags(&state, ctx, id, request, TagOperation::Add).await
}

#[utoipa::path(
    delete,
    path = "/api/v0/files/{id}/tags",
    tag = "tags",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = TagMutationRequest,
    responses(
        (status = 200, description = "Updated file view", body = FileView),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "File belongs to another owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "remove_tags")
)]
pub async fn remove_tags(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<TagMutationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    mutate_tags(&state, ctx, id, request, TagOperation::Remove).await
}

#[utoipa::path(
    put,
    path = "/api/v0/files/{id}/tags",
    tag = "tags",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = TagMutationRequest,
    responses(
        (status = 200, description = "Updated file view", body = FileView),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "File belongs to another owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "replace_tags")
)]
pub async fn replace_tags(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<TagMutationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    mutate_tags(&state, ctx, id, request, TagOperation::Replace).await
}

async fn mutate_tags(
    state: &AppState,
    ctx: OwnerContext,
    id: Uuid,
    request: TagMutationRequest,
    operation: TagOperation,
) -> Result<Json<FileView>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let mut record = load_owned_for_command(state, ctx, id).await?;

    // A request that normalizes to empty is a no-op for every operation;
    // the save is skipped and the current state comes back.
    let requested = normalize_tags(&request.tags);
    if requested.is_empty() {
        let view = build_file_view(state, record).await?;
        return Ok(Json(view));
    }

    record.tags = operation.apply(&record.tags, &requested);
    let record = state.catalog.save_file(record).await?;

    tracing::info!(
        file_id = %record.id,
        tag_count = record.tags.len(),
        tag_operation = ?operation,
        "Updated file tags"
    );

    let view = build_file_view(state, record).await?;
    Ok(Json(view))
}
