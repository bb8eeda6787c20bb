//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pictor-api --test uploads_test` or
//! `cargo test -p pictor-api`. Tests run entirely against the in-memory
//! catalog and storage backends, so no external services are required.

pub mod auth;
pub mod workflows;

use std::sync::Arc;

use axum_test::TestServer;
use pictor_api::auth::{IdentityVerifier, StaticKeyVerifier};
use pictor_api::constants;
use pictor_api::setup::routes;
use pictor_api::state::AppState;
use pictor_catalog::{Catalog, CatalogBridge, MemoryBatchStore, MemoryFileStore};
use pictor_core::config::{
    ApiKeyEntry, AuthConfig, BridgeConfig, DatabaseConfig, QueryConfig, ServerConfig,
    StorageConfig, UploadConfig,
};
use pictor_core::{Config, StorageBackendKind};
use pictor_storage::MemoryStorage;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles to the in-memory backends for
/// simulating client uploads and injecting failures.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MemoryStorage>,
    pub batches: Arc<MemoryBatchStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup test app backed by in-memory catalog and storage.
pub async fn setup_test_app() -> TestApp {
    let config = create_test_config();

    let storage = Arc::new(MemoryStorage::new());
    let files = Arc::new(MemoryFileStore::new());
    let batches = Arc::new(MemoryBatchStore::new());
    let bridge = CatalogBridge::new(config.bridge.catalog_workers);
    let catalog = Catalog::new(files, batches.clone(), bridge);

    let verifier: Arc<dyn IdentityVerifier> =
        Arc::new(StaticKeyVerifier::new(config.auth.api_keys.clone()));

    let state = Arc::new(AppState {
        catalog,
        storage: storage.clone(),
        verifier,
        config: config.clone(),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        batches,
    }
}

fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
        },
        database: DatabaseConfig {
            // Memory stores are wired in directly; no connection is opened.
            url: "postgres://unused".to_string(),
            max_connections: 4,
            connection_timeout_secs: 5,
        },
        storage: StorageConfig {
            backend: StorageBackendKind::Memory,
            bucket: None,
            region: "us-east-1".to_string(),
            endpoint: None,
        },
        auth: AuthConfig {
            api_keys: vec![
                ApiKeyEntry {
                    key: auth::OWNER_A_KEY.to_string(),
                    owner_id: auth::owner_a_id(),
                },
                ApiKeyEntry {
                    key: auth::OWNER_B_KEY.to_string(),
                    owner_id: auth::owner_b_id(),
                },
            ],
        },
        upload: UploadConfig {
            max_file_size_bytes: 10 * 1024 * 1024,
            allowed_content_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "application/pdf".to_string(),
            ],
            write_grant_ttl_secs: 900,
        },
        query: QueryConfig {
            default_page_size: 20,
            max_page_size: 100,
            read_grant_ttl_secs: 300,
        },
        bridge: BridgeConfig { catalog_workers: 4 },
    }
}
