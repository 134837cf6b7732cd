//! Snapshot-consistent data source backed by one PostgreSQL transaction.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use folio_core::error::{StorageError, StorageResult};
use folio_core::models::Record;
use folio_core::ports::{OrderedDataSource, QueryDescriptor, SortDirection};

use super::helpers::{fetch_first_key, fetch_records};
use super::source::SourceConfig;

/// Ordered data source whose queries share one read-only transaction.
///
/// Created by [`super::PgOrderedSource::snapshot`]. Queries are serialized
/// on the transaction's connection. Call [`PgSnapshotSource::finish`] once
/// done; dropping it rolls the transaction back, which is harmless for a
/// read-only snapshot.
pub struct PgSnapshotSource {
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
    config: SourceConfig,
}

impl PgSnapshotSource {
    pub(crate) fn new(tx: Transaction<'static, Postgres>, config: SourceConfig) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
            config,
        }
    }

    /// Commit the snapshot transaction. Later queries fail.
    pub async fn finish(&self) -> StorageResult<()> {
        let Some(tx) = self.tx.lock().await.take() else {
            return Ok(());
        };

        tx.commit()
            .await
            .map_err(|e| StorageError::TransactionError(e.to_string()))?;

        debug!("Snapshot closed");
        Ok(())
    }
}

fn finished() -> StorageError {
    StorageError::TransactionError("snapshot already finished".to_string())
}

#[async_trait]
impl OrderedDataSource for PgSnapshotSource {
    async fn select(&self, query: &QueryDescriptor) -> StorageResult<Vec<Record>> {
        trace!(table = %self.config.table, ?query, "select (snapshot)");
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        fetch_records(&mut **tx, &self.config, query).await
    }

    async fn first_key(&self, sort: SortDirection) -> StorageResult<Option<i64>> {
        trace!(table = %self.config.table, ?sort, "first_key (snapshot)");
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        fetch_first_key(&mut **tx, &self.config, sort).await
    }
}
