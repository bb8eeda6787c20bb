//! Domain route groups (uploads, files, tags, batches).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;

pub fn upload_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/uploads", API_PREFIX),
            post(handlers::uploads::initiate_upload),
        )
        .route(
            &format!("{}/uploads/{{id}}/start", API_PREFIX),
            post(handlers::uploads::start_upload),
        )
        .route(
            &format!("{}/uploads/{{id}}/complete", API_PREFIX),
            post(handlers::uploads::complete_upload),
        )
        .route(
            &format!("{}/uploads/{{id}}/fail", API_PREFIX),
            post(handlers::uploads::fail_upload),
        )
        .route(
            &format!("{}/uploads/{{id}}/status", API_PREFIX),
            get(handlers::uploads::upload_status),
        )
        .with_state(state)
}

pub fn file_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/files", API_PREFIX),
            get(handlers::files::list_files),
        )
        .route(
            &format!("{}/files/{{id}}", API_PREFIX),
            get(handlers::files::get_file),
        )
        .route(
            &format!("{}/files/{{id}}", API_PREFIX),
            delete(handlers::files::delete_file),
        )
        .route(
            &format!("{}/files/{{id}}/download", API_PREFIX),
            get(handlers::files::download_file),
        )
        .with_state(state)
}

pub fn tag_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/files/{{id}}/tags", API_PREFIX),
            post(handlers::tags::add_tags),
        )
        .route(
            &format!("{}/files/{{id}}/tags", API_PREFIX),
            delete(handlers::tags::remove_tags),
        )
        .route(
            &format!("{}/files/{{id}}/tags", API_PREFIX),
            put(handlers::tags::replace_tags),
        )
        .with_state(state)
}

pub fn batch_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/batches/{{id}}", API_PREFIX),
            get(handlers::batches::get_batch),
        )
        .with_state(state)
}
