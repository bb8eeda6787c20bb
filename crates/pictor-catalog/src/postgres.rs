//! PostgreSQL-backed stores using a diesel r2d2 connection pool

use std::time::Duration;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use pictor_core::models::{FileRecord, FileStatus, SortField, UploadBatch};
use pictor_core::AppError;
use uuid::Uuid;

use crate::store::{BatchStore, FileStore};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

fn catalog_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Catalog(e.to_string())
}

/// Create a bounded connection pool from a database URL.
///
/// The pool is warmed with a single connection so that a bad URL fails at
/// startup instead of on the first request.
pub fn build_pool(
    database_url: &str,
    max_size: u32,
    connection_timeout: Duration,
) -> Result<PgPool, AppError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(connection_timeout)
        .build(manager)
        .map_err(|e| AppError::Configuration(format!("Failed to create connection pool: {}", e)))?;

    {
        let _conn = pool.get().map_err(|e| {
            AppError::Configuration(format!("Failed to warm up connection pool: {}", e))
        })?;
    }

    Ok(pool)
}

/// Run pending embedded migrations
pub fn run_migrations(conn: &mut PgConnection) -> Result<(), AppError> {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| AppError::Catalog(format!("Failed to run migrations: {}", e)))?;

    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "Applied database migrations");
    }

    Ok(())
}

/// PostgreSQL implementation of FileStore
#[derive(Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, AppError> {
        self.pool.get().map_err(catalog_err)
    }
}

impl FileStore for PgFileStore {
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "ping"))]
    fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.conn()?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .map(|_| ())
            .map_err(catalog_err)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "files", db.operation = "upsert", db.record_id = %record.id))]
    fn save(&self, record: &FileRecord) -> Result<(), AppError> {
        use crate::schema::files::dsl;

        let row = FileRow::from_record(record);
        let mut conn = self.conn()?;

        diesel::insert_into(dsl::files)
            .values(&row)
            .on_conflict(dsl::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .map(|_| ())
            .map_err(catalog_err)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        use crate::schema::files::dsl;

        let mut conn = self.conn()?;

        dsl::files
            .find(id)
            .first::<FileRow>(&mut conn)
            .optional()
            .map_err(catalog_err)?
            .map(FileRow::into_record)
            .transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", owner_id = %owner_id))]
    fn find_by_owner_paged(
        &self,
        owner_id: Uuid,
        page: i64,
        size: i64,
        sort: SortField,
    ) -> Result<Vec<FileRecord>, AppError> {
        use crate::schema::files::dsl;

        let mut conn = self.conn()?;
        let query = dsl::files.filter(dsl::owner_id.eq(owner_id)).into_boxed();

        load_page(query, page, size, sort, &mut conn)
    }

    #[tracing::instrument(skip(self, tags), fields(db.table = "files", db.operation = "select", owner_id = %owner_id))]
    fn find_by_owner_and_tags_paged(
        &self,
        owner_id: Uuid,
        tags: &[String],
        page: i64,
        size: i64,
        sort: SortField,
    ) -> Result<Vec<FileRecord>, AppError> {
        use crate::schema::files::dsl;

        let mut conn = self.conn()?;
        let query = dsl::files
            .filter(dsl::owner_id.eq(owner_id))
            .filter(dsl::tags.contains(tags.to_vec()))
            .into_boxed();

        load_page(query, page, size, sort, &mut conn)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete", db.record_id = %id))]
    fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        use crate::schema::files::dsl;

        let mut conn = self.conn()?;

        diesel::delete(dsl::files.find(id))
            .execute(&mut conn)
            .map(|deleted| deleted > 0)
            .map_err(catalog_err)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete"))]
    fn delete_stale_pending(&self, older_than: DateTime<Utc>) -> Result<u64, AppError> {
        use crate::schema::files::dsl;

        let mut conn = self.conn()?;

        diesel::delete(
            dsl::files
                .filter(dsl::status.eq(FileStatus::Pending.to_string()))
                .filter(dsl::uploaded_at.lt(older_than)),
        )
        .execute(&mut conn)
        .map(|deleted| deleted as u64)
        .map_err(catalog_err)
    }
}

type BoxedFileQuery<'a> =
    crate::schema::files::BoxedQuery<'a, diesel::pg::Pg>;

fn load_page(
    query: BoxedFileQuery<'_>,
    page: i64,
    size: i64,
    sort: SortField,
    conn: &mut PgConnection,
) -> Result<Vec<FileRecord>, AppError> {
    use crate::schema::files::dsl;

    let query = match sort {
        SortField::UploadDate => query.order((dsl::uploaded_at.desc(), dsl::id.desc())),
        SortField::Filename => query.order((dsl::original_filename.desc(), dsl::id.desc())),
    };

    query
        .offset(page.saturating_mul(size))
        .limit(size)
        .load::<FileRow>(conn)
        .map_err(catalog_err)?
        .into_iter()
        .map(FileRow::into_record)
        .collect()
}

/// PostgreSQL implementation of BatchStore
#[derive(Clone)]
pub struct PgBatchStore {
    pool: PgPool,
}

impl PgBatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, AppError> {
        self.pool.get().map_err(catalog_err)
    }
}

impl BatchStore for PgBatchStore {
    #[tracing::instrument(skip(self, batch), fields(db.table = "upload_batches", db.operation = "upsert", db.record_id = %batch.id))]
    fn save(&self, batch: &UploadBatch) -> Result<(), AppError> {
        use crate::schema::upload_batches::dsl;

        let row = BatchRow::from_batch(batch);
        let mut conn = self.conn()?;

        diesel::insert_into(dsl::upload_batches)
            .values(&row)
            .on_conflict(dsl::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .map(|_| ())
            .map_err(catalog_err)
    }

    #[tracing::instrument(skip(self), fields(db.table = "upload_batches", db.operation = "select", db.record_id = %id))]
    fn find_by_id(&self, id: Uuid) -> Result<Option<UploadBatch>, AppError> {
        use crate::schema::upload_batches::dsl;

        let mut conn = self.conn()?;

        dsl::upload_batches
            .find(id)
            .first::<BatchRow>(&mut conn)
            .optional()
            .map_err(catalog_err)
            .map(|row| row.map(BatchRow::into_batch))
    }

    #[tracing::instrument(skip(self), fields(db.table = "upload_batches", db.operation = "update", db.record_id = %id))]
    fn increment_completed(&self, id: Uuid) -> Result<Option<UploadBatch>, AppError> {
        use crate::schema::upload_batches::dsl;

        let mut conn = self.conn()?;

        // Single bounded update so concurrent completions cannot overshoot
        // the total.
        diesel::update(
            dsl::upload_batches
                .find(id)
                .filter(dsl::completed_files.lt(dsl::total_files)),
        )
        .set(dsl::completed_files.eq(dsl::completed_files + 1))
        .get_result::<BatchRow>(&mut conn)
        .optional()
        .map_err(catalog_err)
        .map(|row| row.map(BatchRow::into_batch))
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::files)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct FileRow {
    id: Uuid,
    owner_id: Uuid,
    batch_id: Option<Uuid>,
    original_filename: String,
    storage_key: String,
    uploaded_at: DateTime<Utc>,
    tags: Vec<String>,
    status: String,
    error_message: Option<String>,
}

impl FileRow {
    fn from_record(record: &FileRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            batch_id: record.batch_id,
            original_filename: record.original_filename.clone(),
            storage_key: record.storage_key.clone(),
            uploaded_at: record.uploaded_at,
            tags: record.tags.clone(),
            status: record.status.to_string(),
            error_message: record.error_message.clone(),
        }
    }

    fn into_record(self) -> Result<FileRecord, AppError> {
        let status = self.status.parse::<FileStatus>().map_err(|e| {
            AppError::Catalog(format!("Invalid status for file {}: {}", self.id, e))
        })?;

        Ok(FileRecord {
            id: self.id,
            owner_id: self.owner_id,
            batch_id: self.batch_id,
            original_filename: self.original_filename,
            storage_key: self.storage_key,
            uploaded_at: self.uploaded_at,
            tags: self.tags,
            status,
            error_message: self.error_message,
        })
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::upload_batches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct BatchRow {
    id: Uuid,
    owner_id: Uuid,
    total_files: i32,
    completed_files: i32,
    created_at: DateTime<Utc>,
}

impl BatchRow {
    fn from_batch(batch: &UploadBatch) -> Self {
        Self {
            id: batch.id,
            owner_id: batch.owner_id,
            total_files: batch.total_files,
            completed_files: batch.completed_files,
            created_at: batch.created_at,
        }
    }

    fn into_batch(self) -> UploadBatch {
        UploadBatch {
            id: self.id,
            owner_id: self.owner_id,
            total_files: self.total_files,
            completed_files: self.completed_files,
            created_at: self.created_at,
        }
    }
}
