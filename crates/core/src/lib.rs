//! Core domain layer for Folio.
//!
//! This crate contains the pagination models, the data source port and the
//! services that turn an opaque cursor into a page of records. It follows
//! hexagonal architecture principles - this is the innermost layer with
//! no dependencies on infrastructure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       folio (binary)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       folio-storage                         │
//! │               (PostgreSQL, in-memory sources)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  folio-core  ← YOU ARE HERE                 │
//! │            (models, ports, codec, planner, resolver)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Page requests, records and results
//! - [`ports`] - The [`ports::OrderedDataSource`] trait and query descriptors
//! - [`services`] - Cursor codec, boundary planner and page resolver
//! - [`error`] - Domain error types
//! - [`metrics`] - Metric definitions
//!
//! # Resolving a Page
//!
//! 1. Decode the cursor (base64 of the decimal ordering key)
//! 2. Plan a probe query for the order mode and direction
//! 3. Run the probe; forward probes fetch one extra row to detect more data
//! 4. Compute the next cursor, or the empty end-of-data cursor
//! 5. Return the rows in display order
//!
//! ```ignore
//! use folio_core::models::{Direction, OrderMode, PageRequest};
//! use folio_core::services::PageResolver;
//!
//! let resolver = PageResolver::new(source);
//! let request = PageRequest::new("", 20, OrderMode::ByKeyAscending);
//! let page = resolver.resolve(&request, Direction::Forward).await?;
//! ```

pub mod error;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;
