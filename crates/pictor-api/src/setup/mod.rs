//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use crate::auth::{IdentityVerifier, StaticKeyVerifier};
use crate::state::AppState;
use anyhow::{Context, Result};
use pictor_catalog::{
    build_pool, run_migrations, Catalog, CatalogBridge, PgBatchStore, PgFileStore, PgPool,
};
use pictor_core::{AppError, Config, StorageBackendKind};
use pictor_storage::{MemoryStorage, ObjectStorage, S3Storage};
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or_else(|_| config.is_production());
    crate::telemetry::init_telemetry(json_logs);

    tracing::info!("Configuration loaded and validated successfully");

    let catalog = setup_catalog(&config).await?;
    let storage = setup_storage(&config)?;
    let verifier: Arc<dyn IdentityVerifier> =
        Arc::new(StaticKeyVerifier::new(config.auth.api_keys.clone()));

    let state = Arc::new(AppState {
        catalog,
        storage,
        verifier,
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Connect the catalog: connection pool, migrations, stores, worker bridge.
async fn setup_catalog(config: &Config) -> Result<Catalog> {
    tracing::info!("Connecting to catalog database...");

    let database_url = config.database.url.clone();
    let max_connections = config.database.max_connections;
    let timeout = Duration::from_secs(config.database.connection_timeout_secs);

    // Pool construction and migrations are blocking diesel calls.
    let pool = tokio::task::spawn_blocking(move || -> Result<PgPool, AppError> {
        let pool = build_pool(&database_url, max_connections, timeout)?;
        let mut conn = pool.get().map_err(|e| {
            AppError::Catalog(format!("Failed to acquire connection for migrations: {}", e))
        })?;
        run_migrations(&mut conn)?;
        Ok(pool)
    })
    .await
    .context("Catalog setup task panicked")??;

    tracing::info!(
        max_connections = config.database.max_connections,
        catalog_workers = config.bridge.catalog_workers,
        "Catalog database connected"
    );

    let bridge = CatalogBridge::new(config.bridge.catalog_workers);
    let files = Arc::new(PgFileStore::new(pool.clone()));
    let batches = Arc::new(PgBatchStore::new(pool));

    Ok(Catalog::new(files, batches, bridge))
}

/// Build the object storage backend selected by configuration.
fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    match config.storage.backend {
        StorageBackendKind::S3 => {
            let bucket = config.storage.bucket.clone().ok_or_else(|| {
                anyhow::anyhow!("S3_BUCKET must be set when using the S3 storage backend")
            })?;
            let storage = S3Storage::new(
                bucket,
                config.storage.region.clone(),
                config.storage.endpoint.clone(),
            )?;
            tracing::info!(backend = "s3", "Object storage initialized");
            Ok(Arc::new(storage))
        }
        StorageBackendKind::Memory => {
            tracing::warn!("Using in-memory object storage; objects are lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
