//! Pagination types shared with data source adapters.
//!
//! A [`QueryDescriptor`] describes one keyset query against the ordering
//! key: an optional comparison with a boundary, a sort direction and a row
//! limit. Adapters translate it into whatever their backend speaks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque cursor for pagination.
///
/// The value is base64 of the decimal ordering key and should be treated
/// as an opaque token by clients. The empty value means "no boundary yet"
/// on input and "no further pages" when returned as a next cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor {
    pub value: String,
}

impl Cursor {
    /// The empty cursor (start of dataset / end-of-data sentinel).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this is the empty token.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Ordering direction for sorted queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl SortDirection {
    /// Return the opposite sort direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Comparison between the ordering key and a boundary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `key < boundary`
    Lt,
    /// `key <= boundary`
    Le,
    /// `key > boundary`
    Gt,
    /// `key >= boundary`
    Ge,
    /// No filter; the boundary is ignored.
    None,
}

impl Comparison {
    /// The comparison that keeps keys at or past `boundary` when scanning
    /// in `sort` order.
    ///
    /// Scanning ascending keeps larger keys (`>=` / `>`), scanning
    /// descending keeps smaller ones (`<=` / `<`).
    pub fn ahead_of(sort: SortDirection, inclusive: bool) -> Self {
        match (sort, inclusive) {
            (SortDirection::Asc, true) => Comparison::Ge,
            (SortDirection::Asc, false) => Comparison::Gt,
            (SortDirection::Desc, true) => Comparison::Le,
            (SortDirection::Desc, false) => Comparison::Lt,
        }
    }

    /// Whether `key` satisfies this comparison against `boundary`.
    pub fn matches(self, key: i64, boundary: i64) -> bool {
        match self {
            Comparison::Lt => key < boundary,
            Comparison::Le => key <= boundary,
            Comparison::Gt => key > boundary,
            Comparison::Ge => key >= boundary,
            Comparison::None => true,
        }
    }

    /// SQL operator, or `None` when no filter applies.
    pub fn as_sql(self) -> Option<&'static str> {
        match self {
            Comparison::Lt => Some("<"),
            Comparison::Le => Some("<="),
            Comparison::Gt => Some(">"),
            Comparison::Ge => Some(">="),
            Comparison::None => None,
        }
    }
}

/// What to ask an ordered data source for.
///
/// This is a description of a query, not its result. Descriptors are
/// immutable; a probe and its display query are two separate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Filter applied to the ordering key.
    pub comparison: Comparison,
    /// Value the ordering key is compared with.
    pub boundary: i64,
    /// Sort direction of the returned rows.
    pub sort: SortDirection,
    /// Maximum number of rows.
    pub limit: u32,
}

impl QueryDescriptor {
    /// One-row, unfiltered query returning the first key in `sort` order.
    ///
    /// Sorted descending this is the dataset's maximum key, ascending its
    /// minimum.
    pub fn first_row(sort: SortDirection) -> Self {
        Self {
            comparison: Comparison::None,
            boundary: 0,
            sort,
            limit: 1,
        }
    }

    /// Same filter and sort with a different row limit.
    pub fn with_limit(self, limit: u32) -> Self {
        Self { limit, ..self }
    }
}
