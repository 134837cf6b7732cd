//! Domain models for page requests and results.
//!
//! These models are storage-agnostic. Every value is created per request
//! and dropped afterwards; the cursor carries the whole pagination state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ports::{Cursor, QueryDescriptor, SortDirection};

/// Page size used when the caller does not provide one.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

// =============================================================================
// Ordering
// =============================================================================

/// Display order of pages relative to the ordering key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMode {
    /// Smallest key first.
    ByKeyAscending,
    /// Largest key first.
    #[default]
    ByKeyDescending,
}

impl OrderMode {
    /// Sort direction pages are displayed in.
    pub fn natural_sort(self) -> SortDirection {
        match self {
            OrderMode::ByKeyAscending => SortDirection::Asc,
            OrderMode::ByKeyDescending => SortDirection::Desc,
        }
    }

    /// Short label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderMode::ByKeyAscending => "asc",
            OrderMode::ByKeyDescending => "desc",
        }
    }
}

/// Navigation direction relative to the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The page starting at the cursor.
    #[default]
    Forward,
    /// The page preceding the cursor.
    Backward,
}

impl Direction {
    /// Map a caller's `previous` flag to a direction.
    pub fn from_previous_flag(previous: bool) -> Self {
        if previous {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// Sort direction the data source is scanned in for `mode`.
    ///
    /// Backward navigation scans against the display order, so the rows
    /// closest to the cursor come first.
    pub fn traversal_sort(self, mode: OrderMode) -> SortDirection {
        match self {
            Direction::Forward => mode.natural_sort(),
            Direction::Backward => mode.natural_sort().reversed(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

/// A parsed `order_by` value: ordering column plus mode.
///
/// `"id"` orders ascending by `id`, `"-id"` descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub mode: OrderMode,
}

/// Error returned when an `order_by` value names no column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOrderByError(pub String);

impl fmt::Display for ParseOrderByError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid order_by '{}': expected 'column' or '-column'", self.0)
    }
}

impl std::error::Error for ParseOrderByError {}

impl FromStr for OrderBy {
    type Err = ParseOrderByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (column, mode) = match trimmed.strip_prefix('-') {
            Some(column) => (column, OrderMode::ByKeyDescending),
            None => (trimmed, OrderMode::ByKeyAscending),
        };

        if column.is_empty() {
            return Err(ParseOrderByError(s.to_string()));
        }

        Ok(Self {
            column: column.to_string(),
            mode,
        })
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            OrderMode::ByKeyAscending => write!(f, "{}", self.column),
            OrderMode::ByKeyDescending => write!(f, "-{}", self.column),
        }
    }
}

// =============================================================================
// Requests & Results
// =============================================================================

/// Parameters of one page request. Direction is supplied per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Cursor returned by a previous page, or empty for the first page.
    pub cursor: Cursor,
    /// Number of rows per page. Must be positive; callers validate it.
    pub page_size: u32,
    /// Display order.
    pub order_mode: OrderMode,
}

impl PageRequest {
    pub fn new(cursor: impl Into<Cursor>, page_size: u32, order_mode: OrderMode) -> Self {
        Self {
            cursor: cursor.into(),
            page_size,
            order_mode,
        }
    }

    /// Same page size and order, continuing from `cursor`.
    pub fn with_cursor(&self, cursor: Cursor) -> Self {
        Self {
            cursor,
            ..self.clone()
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            cursor: Cursor::empty(),
            page_size: DEFAULT_PAGE_SIZE,
            order_mode: OrderMode::default(),
        }
    }
}

/// A record returned by an ordered data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Ordering key.
    pub key: i64,
    /// Full row as JSON.
    pub fields: serde_json::Value,
}

impl Record {
    pub fn new(key: i64, fields: serde_json::Value) -> Self {
        Self { key, fields }
    }
}

/// A resolved page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Rows in display order (backward pages are already reversed).
    pub rows: Vec<Record>,
    /// Display query: the probe's filter and sort limited to the page size.
    pub query: QueryDescriptor,
    /// Cursor of the next page in the requested direction; empty at the end.
    pub next_cursor: Cursor,
}

impl PageResult {
    /// Whether the dataset is exhausted in the requested direction.
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_empty()
    }

    /// Ordering keys of the page rows, in display order.
    pub fn keys(&self) -> Vec<i64> {
        self.rows.iter().map(|record| record.key).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
