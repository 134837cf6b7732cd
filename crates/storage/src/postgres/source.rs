//! Ordered data source over a PostgreSQL table.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, trace};

use folio_core::error::{StorageError, StorageResult};
use folio_core::models::Record;
use folio_core::ports::{OrderedDataSource, QueryDescriptor, SortDirection};

use super::database::Database;
use super::helpers::{fetch_first_key, fetch_records, validate_identifier, validate_table_name};
use super::snapshot::PgSnapshotSource;

/// Which table to paginate and which column orders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Table name, optionally schema-qualified (`public.movies`).
    pub table: String,
    /// Integer column totally ordering the table (usually the primary key).
    pub key_column: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            table: String::new(),
            key_column: "id".to_string(),
        }
    }
}

impl SourceConfig {
    pub fn new(table: &str, key_column: &str) -> Self {
        Self {
            table: table.to_string(),
            key_column: key_column.to_string(),
        }
    }

    /// Reject names that are not plain identifiers.
    ///
    /// Both names are spliced into SQL, so this must pass before any
    /// query is built.
    pub fn validate(&self) -> StorageResult<()> {
        validate_table_name(&self.table)?;
        validate_identifier(&self.key_column, "key column")
    }
}

/// PostgreSQL implementation of OrderedDataSource.
pub struct PgOrderedSource {
    pool: PgPool,
    config: SourceConfig,
}

impl PgOrderedSource {
    /// Create a source after validating the table and key column names.
    pub fn new(db: &Database, config: SourceConfig) -> StorageResult<Self> {
        config.validate()?;
        Ok(Self {
            pool: db.pool().clone(),
            config,
        })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Open a read-only, repeatable-read snapshot of the table.
    ///
    /// Every query through the returned source sees the same data, so the
    /// probes of one page cannot disagree with each other.
    #[instrument(skip(self), fields(table = %self.config.table))]
    pub async fn snapshot(&self) -> StorageResult<PgSnapshotSource> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::TransactionError(e.to_string()))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::TransactionError(e.to_string()))?;

        debug!("Snapshot opened");

        Ok(PgSnapshotSource::new(tx, self.config.clone()))
    }
}

#[async_trait]
impl OrderedDataSource for PgOrderedSource {
    async fn select(&self, query: &QueryDescriptor) -> StorageResult<Vec<Record>> {
        trace!(table = %self.config.table, ?query, "select");
        fetch_records(&self.pool, &self.config, query).await
    }

    async fn first_key(&self, sort: SortDirection) -> StorageResult<Option<i64>> {
        trace!(table = %self.config.table, ?sort, "first_key");
        fetch_first_key(&self.pool, &self.config, sort).await
    }
}
