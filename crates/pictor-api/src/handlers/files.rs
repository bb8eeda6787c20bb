//! File query and deletion handlers.
//!
//! Every read response carries a freshly minted download grant; grants are
//! never persisted or cached.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pictor_core::models::{normalize_tags, DownloadResponse, FileRecord, FileView, SortField};
use pictor_core::AppError;
use pictor_storage::StorageError;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::models::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::uploads::load_owned_for_command;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    #[serde(default)]
    pub page: i64,
    pub size: Option<i64>,
    /// Sort column: "uploadDate" (default) or "filename".
    pub sort_by: Option<String>,
    /// Comma-separated tag filter; matching files carry every listed tag.
    pub tags: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v0/files",
    tag = "files",
    params(
        ListFilesQuery
    ),
    responses(
        (status = 200, description = "Page of files owned by the caller", body = Vec<FileView>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 502, description = "Storage backend unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query),
    fields(
        owner_id = %ctx.owner_id,
        page = query.page,
        size = ?query.size,
        sort_by = ?query.sort_by,
        operation = "list_files"
    )
)]
pub async fn list_files(
    ctx: OwnerContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListFilesQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = query.page.max(0);
    // Clamp page size to the configured bounds.
    let size = query
        .size
        .unwrap_or(state.config.query.default_page_size)
        .clamp(1, state.config.query.max_page_size);
    let sort = SortField::resolve(query.sort_by.as_deref());

    let tags = match &query.tags {
        Some(raw) => normalize_tags(&raw.split(',').collect::<Vec<_>>()),
        None => Vec::new(),
    };

    let records = state
        .catalog
        .list_files(ctx.owner_id, tags, page, size, sort)
        .await?;

    let mut views = Vec::with_capacity(records.len());
    for record in records {
        views.push(build_file_view(&state, record).await?);
    }

    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/api/v0/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File found", body = FileView),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 502, description = "Storage backend unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "get_file")
)]
pub async fn get_file(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = load_owned_for_query(&state, ctx, id).await?;
    let view = build_file_view(&state, record).await?;

    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/v0/files/{id}/download",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Short-lived download grant", body = DownloadResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 502, description = "Storage backend unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "download_file")
)]
pub async fn download_file(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = load_owned_for_query(&state, ctx, id).await?;

    let ttl = Duration::from_secs(state.config.query.read_grant_ttl_secs);
    let grant = state
        .storage
        .mint_read_grant(&record.storage_key, ttl)
        .await?;

    Ok(Json(DownloadResponse {
        url: grant.url,
        expires_at: grant.expires_at,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v0/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 403, description = "File belongs to another owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 502, description = "Storage backend unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(owner_id = %ctx.owner_id, file_id = %id, operation = "delete_file")
)]
pub async fn delete_file(
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = load_owned_for_command(&state, ctx, id).await?;

    // Object cleanup happens BEFORE the catalog delete, so a storage failure
    // leaves the record in place for a retry.
    match state.storage.delete_object(&record.storage_key).await {
        Ok(()) => {}
        // Pending files that never uploaded have no object behind the key.
        Err(StorageError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let removed = state.catalog.delete_file(id).await?;

    tracing::info!(
        file_id = %id,
        storage_key = %record.storage_key,
        removed,
        "Deleted file"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Load a file for a read operation, masking foreign ownership as NotFound.
pub(crate) async fn load_owned_for_query(
    state: &AppState,
    ctx: OwnerContext,
    id: Uuid,
) -> Result<FileRecord, HttpAppError> {
    state
        .catalog
        .find_file(id)
        .await?
        .filter(|r| r.owner_id == ctx.owner_id)
        .ok_or_else(|| AppError::NotFound("File not found".to_string()).into())
}

/// Assemble the wire view of a file with a freshly minted download grant.
pub(crate) async fn build_file_view(
    state: &AppState,
    record: FileRecord,
) -> Result<FileView, HttpAppError> {
    let ttl = Duration::from_secs(state.config.query.read_grant_ttl_secs);
    let grant = state
        .storage
        .mint_read_grant(&record.storage_key, ttl)
        .await?;

    Ok(FileView::new(record, grant.url))
}
