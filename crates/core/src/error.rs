//! Error types for the pagination domain layer.
//!
//! This module defines two error types:
//!
//! - [`StorageError`] - Failures reported by an ordered data source
//! - [`PaginationError`] - Errors returned by page resolution
//!
//! `StorageError` converts into `PaginationError` via `From`, so `?`
//! works across the port boundary.

use thiserror::Error;

// =============================================================================
// Storage Errors
// =============================================================================

/// Data source errors.
///
/// These errors originate from adapters implementing
/// [`crate::ports::OrderedDataSource`]: connections, queries, transactions
/// and row decoding.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to establish database connection.
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// Query execution failed.
    #[error("Query execution error: {0}")]
    QueryError(String),

    /// Transaction begin/commit/rollback failed.
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Row data could not be decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A table or column name is not a plain SQL identifier.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

// =============================================================================
// Pagination Errors
// =============================================================================

/// Errors returned by [`crate::services::PageResolver`].
///
/// Either a full page is produced or one of these is returned; there is
/// no partial result.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// The cursor token is not base64 of a decimal key.
    ///
    /// Only the empty token has a default; anything else that fails to
    /// decode is a client error.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// The ordered data source failed to answer a query.
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(#[from] StorageError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for data source operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for pagination operations.
pub type PaginationResult<T> = Result<T, PaginationError>;
