//! Storage layer for Folio.
//!
//! This crate provides implementations of the `OrderedDataSource` port
//! defined in `folio-core`.
//!
//! # Architecture
//!
//! - [`postgres::Database`] - Connection pool management
//! - [`postgres::PgOrderedSource`] - Keyset queries against a PostgreSQL table
//! - [`postgres::PgSnapshotSource`] - Snapshot-consistent variant for one page
//! - [`memory::MemorySource`] - Ordered records held in memory
//!
//! # Usage
//!
//! ```ignore
//! use folio_storage::{Database, DatabaseConfig, PgOrderedSource, SourceConfig};
//!
//! let db = Database::connect(&DatabaseConfig::from_env()).await?;
//! let source = Arc::new(PgOrderedSource::new(&db, SourceConfig::new("movies", "id"))?);
//! let resolver = PageResolver::new(source);
//! ```

pub mod memory;
pub mod postgres;

pub use memory::MemorySource;
pub use postgres::{Database, DatabaseConfig, PgOrderedSource, PgSnapshotSource, SourceConfig};
