//! Page resolution - orchestrates one pagination round trip.
//!
//! # Flow
//!
//! 1. Decode the cursor (descending pages with an empty cursor start at the
//!    current maximum key, which costs one extra query)
//! 2. Plan the probe and display queries
//! 3. Run the probe
//! 4. Compute the next cursor, consulting the dataset's extreme key when
//!    the probe did not prove that more rows follow
//! 5. Return the page rows in display order

use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::error::PaginationResult;
use crate::metrics::{
    ResolveTimer, record_data_source_query, record_end_of_data, record_invalid_cursor,
    record_page_resolved,
};
use crate::models::{Direction, OrderMode, PageRequest, PageResult};
use crate::ports::{Cursor, OrderedDataSource, SortDirection};

use super::codec::{decode_cursor, encode_cursor};
use super::planner::plan;

/// Boundary used by ascending pages when the cursor is empty.
pub const ASCENDING_ORIGIN: i64 = i64::MIN;

/// Resolves pages against an ordered data source.
///
/// The resolver holds no pagination state; every call is independent and
/// calls may run concurrently.
pub struct PageResolver<S: OrderedDataSource + ?Sized> {
    source: Arc<S>,
}

impl<S: OrderedDataSource + ?Sized> Clone for PageResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<S: OrderedDataSource + ?Sized> PageResolver<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Access the underlying data source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve one page.
    ///
    /// Backward pages are returned in display order, so callers never
    /// reverse rows themselves. An empty `next_cursor` means the dataset
    /// is exhausted in `direction`.
    #[instrument(skip_all, fields(
        order = request.order_mode.as_str(),
        direction = direction.as_str(),
        page_size = request.page_size
    ))]
    pub async fn resolve(
        &self,
        request: &PageRequest,
        direction: Direction,
    ) -> PaginationResult<PageResult> {
        let _timer = ResolveTimer::new();

        let boundary = self.boundary(request).await?;
        let plan = plan(request.order_mode, direction, boundary, request.page_size);
        trace!(probe = ?plan.probe, "Running probe");

        record_data_source_query("probe");
        let mut rows = self.source.select(&plan.probe).await?;

        let page_size = plan.display.limit as usize;
        let lookahead = if plan.overfetches() {
            rows.get(page_size).map(|record| record.key)
        } else {
            None
        };
        rows.truncate(page_size);

        let next_cursor = match (lookahead, rows.last()) {
            // The overfetched row opens the next page under the inclusive filter.
            (Some(next_key), _) => encode_cursor(next_key),
            (None, Some(last)) => self.cursor_unless_extreme(last.key, plan.probe.sort).await?,
            (None, None) => Cursor::empty(),
        };

        if direction == Direction::Backward {
            rows.reverse();
        }

        debug!(
            rows = rows.len(),
            boundary,
            last_page = next_cursor.is_empty(),
            "Page resolved"
        );

        if next_cursor.is_empty() {
            record_end_of_data();
        }
        record_page_resolved(request.order_mode, direction);

        Ok(PageResult {
            rows,
            query: plan.display,
            next_cursor,
        })
    }

    /// Decode the request cursor, substituting the mode's starting boundary
    /// for the empty token.
    async fn boundary(&self, request: &PageRequest) -> PaginationResult<i64> {
        let default_for_empty = match request.order_mode {
            OrderMode::ByKeyAscending => ASCENDING_ORIGIN,
            OrderMode::ByKeyDescending if request.cursor.is_empty() => {
                record_data_source_query("first_key");
                self.source
                    .first_key(SortDirection::Desc)
                    .await?
                    .unwrap_or(i64::MAX)
            }
            // Only consulted for the empty token.
            OrderMode::ByKeyDescending => i64::MAX,
        };

        decode_cursor(&request.cursor, default_for_empty).inspect_err(|e| {
            record_invalid_cursor();
            warn!(error = %e, "Rejected cursor");
        })
    }

    /// Encode `candidate` unless it is the last key of the dataset when
    /// scanning in `sort` order, in which case the page is the last one.
    async fn cursor_unless_extreme(
        &self,
        candidate: i64,
        sort: SortDirection,
    ) -> PaginationResult<Cursor> {
        record_data_source_query("first_key");
        let extreme = self.source.first_key(sort.reversed()).await?;
        trace!(candidate, ?extreme, "Checking end of data");

        if extreme == Some(candidate) {
            Ok(Cursor::empty())
        } else {
            Ok(encode_cursor(candidate))
        }
    }
}
