//! Metrics definitions for page resolution.
//!
//! Metrics are recorded through the `metrics` facade. Nothing is exported
//! unless the embedding application installs a recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

use crate::models::{Direction, OrderMode};

/// Initialize all metric descriptions.
/// Call this once at startup, after installing a recorder.
pub fn init_metrics() {
    describe_counter!(
        "pages_resolved_total",
        "Total number of pages successfully resolved"
    );
    describe_counter!(
        "end_of_data_total",
        "Total number of pages returned with the end-of-data cursor"
    );
    describe_counter!(
        "invalid_cursors_total",
        "Total number of rejected cursor tokens"
    );
    describe_counter!(
        "data_source_queries_total",
        "Total number of queries sent to the ordered data source"
    );
    describe_histogram!(
        "page_resolve_duration_seconds",
        "Time taken to resolve a page in seconds"
    );
}

/// Record a resolved page.
pub fn record_page_resolved(order: OrderMode, direction: Direction) {
    counter!(
        "pages_resolved_total",
        "order" => order.as_str(),
        "direction" => direction.as_str()
    )
    .increment(1);
}

/// Record a page that ended the traversal.
pub fn record_end_of_data() {
    counter!("end_of_data_total").increment(1);
}

/// Record a rejected cursor token.
pub fn record_invalid_cursor() {
    counter!("invalid_cursors_total").increment(1);
}

/// Record a data source query.
///
/// # Arguments
/// * `kind` - `"probe"` for page probes, `"first_key"` for extreme-key lookups
pub fn record_data_source_query(kind: &'static str) {
    counter!("data_source_queries_total", "kind" => kind).increment(1);
}

/// Record page resolution duration.
pub fn record_resolve_duration(duration_secs: f64) {
    histogram!("page_resolve_duration_seconds").record(duration_secs);
}

/// A timer that records resolution duration when dropped.
pub struct ResolveTimer {
    start: Instant,
}

impl ResolveTimer {
    /// Start a new resolve timer.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for ResolveTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResolveTimer {
    fn drop(&mut self) {
        record_resolve_duration(self.start.elapsed().as_secs_f64());
    }
}
