//! Upload lifecycle handlers: initiate a direct upload and report its
//! progress, completion, or failure.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pictor_core::models::{
    FileRecord, FileStatus, InitiateUploadRequest, InitiateUploadResponse, ReportFailureRequest,
    UploadBatch, UploadStatusResponse,
};
use pictor_core::validation::upload::{
    validate_batch_selector, validate_content_type, validate_file_size, validate_filename,
};
use pictor_core::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::auth::models::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Initiate a direct upload: persist a pending file record and mint a
/// write grant for the client to PUT the bytes to.
#[utoipa::path(
    post,
    path = "/api/v0/uploads",
    tag = "uploads",
    request_body = InitiateUploadRequest,
    responses(
        (status = 201, description = "Upload initiated, write grant minted", body = InitiateUploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 502, description = "Storage backend unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        owner_id = %ctx.owner_id,
        filename = %request.filename,
        operation = "initiate_upload"
    )
)]
pub async fn initiate_upload(
    ctx: OwnerContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<InitiateUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    validate_filename(&request.filename)?;
    validate_file_size(request.size_bytes, state.config.upload.max_file_size_bytes)?;
    validate_content_type(
        &request.content_type,
        &state.config.upload.allowed_content_types,
    )?;
    validate_batch_selector(request.batch_id, request.batch_total)?;

    let batch_id = resolve_batch(&state, ctx.owner_id, &request).await?;

    let record = FileRecord::create(ctx.owner_id, batch_id, &request.filename, &request.tags);
    let record = state.catalog.save_file(record).await?;

    // The record is persisted before the grant is minted. If minting fails
    // the file stays pending and the client can retry or report failure.
    let ttl = Duration::from_secs(state.config.upload.write_grant_ttl_secs);
    let grant = state
        .storage
        .mint_write_grant(&record.storage_key, &request.content_type, ttl)
        .await?;

    tracing::info!(
        file_id = %record.id,
        storage_key = %record.storage_key,
        batch_id = ?batch_id,
        "Initiated direct upload"
    );

    Ok((
        StatusCode::CREATED,
        Json(InitiateUploadResponse {
            file_id: record.id,
            write_url: grant.url,
            s3_key: record.storage_key,
            expires_at: grant.expires_at,
            batch_id,
        }),
    ))
}

/// Create or join the upload batch named by the request, if any.
///
/// A foreign or unknown `batchId` masks as NotFound so callers cannot probe
/// other owners' batches.
async fn resolve_batch(
    state: &AppState,
    owner_id: Uuid,
    request: &InitiateUploadRequest,
) -> Result<Option<Uuid>, HttpAppError> {
    if let Some(total) = request.batch_total {
        let batch = state
            .catalog
            .save_batch(UploadBatch::create(owner_id, total))
            .await?;
        return Ok(Some(batch.id));
    }

    if let Some(batch_id) = request.batch_id {
        let batch = state
            .catalog
            .find_batch(batch_id)
            .await?
            .filter(|b| b.owner_id == owner_id)
            .ok_or_else(|| AppError::NotFound("Batch not found".to_string()))?;
        return Ok(Some(batch.id));
    }

    Ok(None)
}

/// Mark an upload as in progress once the client starts its direct PUT.
#[utoipa::path(
    post,
    path = "/api/v0/uploads/{id}/start",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Upload marked as in progress", body = UploadStatusResponse),
        (status = 403, description = "File belongs to another owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 409, description = "File already in a terminal state", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "start_upload")
)]
pub async fn start_upload(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut record = load_owned_for_command(&state, ctx, id).await?;

    // Reporting progress twice is an idempotent no-op.
    if record.status != FileStatus::Uploading {
        record.transition(FileStatus::Uploading, None)?;
        record = state.catalog.save_file(record).await?;
    }

    Ok(Json(UploadStatusResponse {
        status: record.status,
        error_message: record.error_message,
    }))
}

/// Record that the client finished its direct upload.
#[utoipa::path(
    post,
    path = "/api/v0/uploads/{id}/complete",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Upload recorded as completed", body = UploadStatusResponse),
        (status = 403, description = "File belongs to another owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 409, description = "File already in a terminal state", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "complete_upload")
)]
pub async fn complete_upload(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut record = load_owned_for_command(&state, ctx, id).await?;

    record.transition(FileStatus::Completed, None)?;
    let record = state.catalog.save_file(record).await?;

    // The file row is the source of truth for completion; counter
    // updates are best-effort and never fail the request.
    if let Some(batch_id) = record.batch_id {
        match state.catalog.increment_batch_completed(batch_id).await {
            Ok(Some(batch)) if batch.is_complete() => {
                tracing::info!(
                    batch_id = %batch.id,
                    total_files = batch.total_files,
                    "Upload batch completed"
                );
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!(
                    batch_id = %batch_id,
                    file_id = %record.id,
                    "Batch counter already saturated or batch missing"
                );
            }
            Err(e) => {
                tracing::warn!(
                    batch_id = %batch_id,
                    file_id = %record.id,
                    error = %e,
                    "Failed to update batch counter for completed upload"
                );
            }
        }
    }

    tracing::info!(file_id = %record.id, "Upload completed");

    Ok(Json(UploadStatusResponse {
        status: record.status,
        error_message: record.error_message,
    }))
}

/// Record that the client's direct upload failed.
#[utoipa::path(
    post,
    path = "/api/v0/uploads/{id}/fail",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = ReportFailureRequest,
    responses(
        (status = 200, description = "Upload recorded as failed", body = UploadStatusResponse),
        (status = 403, description = "File belongs to another owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 409, description = "File already in a terminal state", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "fail_upload")
)]
pub async fn fail_upload(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ReportFailureRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let mut record = load_owned_for_command(&state, ctx, id).await?;

    record.transition(FileStatus::Failed, request.error_message)?;
    let record = state.catalog.save_file(record).await?;

    tracing::info!(
        file_id = %record.id,
        reason = ?record.error_message,
        "Upload failed"
    );

    Ok(Json(UploadStatusResponse {
        status: record.status,
        error_message: record.error_message,
    }))
}

/// Report the current lifecycle state of an upload.
#[utoipa::path(
    get,
    path = "/api/v0/uploads/{id}/status",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Current upload status", body = UploadStatusResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "upload_status")
)]
pub async fn upload_status(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state
        .catalog
        .find_file(id)
        .await?
        .filter(|r| r.owner_id == ctx.owner_id)
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    Ok(Json(UploadStatusResponse {
        status: record.status,
        error_message: record.error_message,
    }))
}

/// Load a file for a state-changing operation: missing files are NotFound,
/// foreign files are NotAuthorized.
pub(crate) async fn load_owned_for_command(
    state: &AppState,
    ctx: OwnerContext,
    id: Uuid,
) -> Result<FileRecord, HttpAppError> {
    let record = state
        .catalog
        .find_file(id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    if record.owner_id != ctx.owner_id {
        return Err(AppError::NotAuthorized(
            "File belongs to another owner".to_string(),
        )
        .into());
    }

    Ok(record)
}
