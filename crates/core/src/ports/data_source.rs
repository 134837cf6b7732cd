//! Port trait for ordered data sources.
//!
//! This trait is the only boundary of the pagination core. Implementations
//! live in the infrastructure layer (e.g., `folio-storage`).

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::models::Record;

use super::pagination::{QueryDescriptor, SortDirection};

/// A collection totally ordered by a single scalar key.
#[async_trait]
pub trait OrderedDataSource: Send + Sync {
    /// Run a keyset query.
    ///
    /// Returns at most `query.limit` records whose key satisfies
    /// `query.comparison` against `query.boundary`, sorted by key in
    /// `query.sort` order.
    async fn select(&self, query: &QueryDescriptor) -> StorageResult<Vec<Record>>;

    /// Key of the first record in `sort` order, or `None` when empty.
    ///
    /// Descending gives the maximum key, ascending the minimum.
    async fn first_key(&self, sort: SortDirection) -> StorageResult<Option<i64>> {
        let rows = self.select(&QueryDescriptor::first_row(sort)).await?;
        Ok(rows.first().map(|record| record.key))
    }
}
