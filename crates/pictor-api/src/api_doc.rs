//! OpenAPI documentation.
//! The generated document is served at /openapi.json and rendered at /docs.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use pictor_core::models;

/// Returns the assembled OpenAPI document.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pictor API",
        version = "0.1.0",
        description = "File upload and catalog API (v0). Clients upload bytes directly to object storage through short-lived grants; the service tracks ownership, upload lifecycle, tags, and batches. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Uploads
        handlers::uploads::initiate_upload,
        handlers::uploads::start_upload,
        handlers::uploads::complete_upload,
        handlers::uploads::fail_upload,
        handlers::uploads::upload_status,
        // Files
        handlers::files::list_files,
        handlers::files::get_file,
        handlers::files::download_file,
        handlers::files::delete_file,
        // Tags
        handlers::tags::add_tags,
        handlers::tags::remove_tags,
        handlers::tags::replace_tags,
        // Batches
        handlers::batches::get_batch,
    ),
    components(
        schemas(
            // Core models
            models::FileView,
            models::FileStatus,
            models::BatchView,
            // Upload models
            models::InitiateUploadRequest,
            models::InitiateUploadResponse,
            models::ReportFailureRequest,
            models::UploadStatusResponse,
            models::DownloadResponse,
            // Tag models
            models::TagMutationRequest,
            // Query params
            handlers::files::ListFilesQuery,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Direct upload initiation and lifecycle reporting"),
        (name = "files", description = "File queries, downloads, and deletion"),
        (name = "tags", description = "Tag mutation operations"),
        (name = "batches", description = "Upload batch progress queries")
    )
)]
pub struct ApiDoc;
