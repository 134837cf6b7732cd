//! PostgreSQL storage adapter.
//!
//! This module implements the `OrderedDataSource` port from `folio-core`
//! using a PostgreSQL table as the backing store.
//!
//! # Architecture
//!
//! - [`Database`] - Connection pool
//! - [`PgOrderedSource`] - Keyset queries against one table
//! - [`PgSnapshotSource`] - The same queries inside one repeatable-read transaction
//!
//! # Usage
//!
//! ```ignore
//! let db = Database::connect(&DatabaseConfig::for_cli(&database_url)).await?;
//! let source = PgOrderedSource::new(&db, SourceConfig::new("movies", "id"))?;
//!
//! let snapshot = Arc::new(source.snapshot().await?);
//! let page = PageResolver::new(snapshot.clone()).resolve(&request, direction).await?;
//! snapshot.finish().await?;
//! ```

mod database;
mod helpers;
mod snapshot;
mod source;

pub use database::{Database, DatabaseConfig};
pub use snapshot::PgSnapshotSource;
pub use source::{PgOrderedSource, SourceConfig};
