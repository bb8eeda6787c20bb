//! Configuration module
//!
//! This module provides configuration structures for the API and services,
//! including database, storage, authentication, and upload settings. All
//! values come from the environment, with named constants for every default.

use std::env;

use uuid::Uuid;

// Common constants
const SERVER_PORT: u16 = 4000;
const DB_MAX_CONNECTIONS: u32 = 8;
const DB_CONNECTION_TIMEOUT_SECS: u64 = 30;
const CATALOG_WORKERS: usize = 8;
const MAX_FILE_SIZE_MB: u64 = 10;
const WRITE_GRANT_TTL_SECS: u64 = 900;
const WRITE_GRANT_TTL_MIN_SECS: u64 = 900;
const WRITE_GRANT_TTL_MAX_SECS: u64 = 3600;
const READ_GRANT_TTL_SECS: u64 = 900;
const READ_GRANT_TTL_MIN_SECS: u64 = 60;
const READ_GRANT_TTL_MAX_SECS: u64 = 3600;
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;
const S3_REGION: &str = "us-east-1";

/// Which object storage backend serves grant requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackendKind {
    S3,
    Memory,
}

/// One configured API credential mapped to the owner it authenticates.
#[derive(Clone, Debug)]
pub struct ApiKeyEntry {
    pub key: String,
    pub owner_id: Uuid,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    pub bucket: Option<String>,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub api_keys: Vec<ApiKeyEntry>,
}

#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub write_grant_ttl_secs: u64,
}

#[derive(Clone, Debug)]
pub struct QueryConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub read_grant_ttl_secs: u64,
}

#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub catalog_workers: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub upload: UploadConfig,
    pub query: QueryConfig,
    pub bridge: BridgeConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server = ServerConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DB_MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(DB_MAX_CONNECTIONS),
            connection_timeout_secs: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DB_CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DB_CONNECTION_TIMEOUT_SECS),
        };

        let backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackendKind::Memory,
            _ => StorageBackendKind::S3,
        };

        let storage = StorageConfig {
            backend,
            bucket: env::var("S3_BUCKET").ok(),
            region: env::var("S3_REGION").unwrap_or_else(|_| S3_REGION.to_string()),
            endpoint: env::var("S3_ENDPOINT").ok(),
        };

        let api_keys_str =
            env::var("API_KEYS").map_err(|_| anyhow::anyhow!("API_KEYS must be set"))?;
        let auth = AuthConfig {
            api_keys: parse_api_keys(&api_keys_str)?,
        };

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| "image/jpeg,image/png,image/gif,image/webp".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let upload = UploadConfig {
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_content_types,
            write_grant_ttl_secs: clamp_write_grant_ttl(
                env::var("WRITE_GRANT_TTL_SECS")
                    .unwrap_or_else(|_| WRITE_GRANT_TTL_SECS.to_string())
                    .parse()
                    .unwrap_or(WRITE_GRANT_TTL_SECS),
            ),
        };

        let query = QueryConfig {
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_PAGE_SIZE),
            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| MAX_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(MAX_PAGE_SIZE),
            read_grant_ttl_secs: clamp_read_grant_ttl(
                env::var("READ_GRANT_TTL_SECS")
                    .unwrap_or_else(|_| READ_GRANT_TTL_SECS.to_string())
                    .parse()
                    .unwrap_or(READ_GRANT_TTL_SECS),
            ),
        };

        let bridge = BridgeConfig {
            catalog_workers: env::var("CATALOG_WORKERS")
                .unwrap_or_else(|_| CATALOG_WORKERS.to_string())
                .parse()
                .unwrap_or(CATALOG_WORKERS),
        };

        let config = Config {
            server,
            database,
            storage,
            auth,
            upload,
            query,
            bridge,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.auth.api_keys.is_empty() {
            return Err(anyhow::anyhow!(
                "API_KEYS must contain at least one key:owner-uuid entry"
            ));
        }
        if self.storage.backend == StorageBackendKind::S3 && self.storage.bucket.is_none() {
            return Err(anyhow::anyhow!(
                "S3_BUCKET must be set when STORAGE_BACKEND is s3"
            ));
        }
        if self.bridge.catalog_workers == 0 {
            return Err(anyhow::anyhow!("CATALOG_WORKERS must be at least 1"));
        }
        if self.query.default_page_size < 1 || self.query.max_page_size < self.query.default_page_size
        {
            return Err(anyhow::anyhow!(
                "DEFAULT_PAGE_SIZE must be >= 1 and <= MAX_PAGE_SIZE"
            ));
        }
        Ok(())
    }
}

/// Parse `API_KEYS` entries of the form `key:owner-uuid`, comma-separated.
fn parse_api_keys(raw: &str) -> Result<Vec<ApiKeyEntry>, anyhow::Error> {
    let mut entries = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, owner) = part
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("API_KEYS entry '{}' must be key:owner-uuid", part))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow::anyhow!("API_KEYS entry has an empty key"));
        }
        let owner_id = owner
            .trim()
            .parse::<Uuid>()
            .map_err(|_| anyhow::anyhow!("API_KEYS entry '{}' has an invalid owner UUID", part))?;
        entries.push(ApiKeyEntry {
            key: key.to_string(),
            owner_id,
        });
    }
    Ok(entries)
}

fn clamp_write_grant_ttl(secs: u64) -> u64 {
    secs.clamp(WRITE_GRANT_TTL_MIN_SECS, WRITE_GRANT_TTL_MAX_SECS)
}

fn clamp_read_grant_ttl(secs: u64) -> u64 {
    secs.clamp(READ_GRANT_TTL_MIN_SECS, READ_GRANT_TTL_MAX_SECS)
}
