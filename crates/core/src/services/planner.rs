//! Boundary planning.
//!
//! Maps an order mode, a direction and a decoded boundary to the keyset
//! queries for one page:
//!
//! | order | direction | sort | filter              | probe limit | display limit |
//! |-------|-----------|------|---------------------|-------------|---------------|
//! | asc   | forward   | ASC  | `key >= boundary`   | size + 1    | size          |
//! | asc   | backward  | DESC | `key < boundary`    | size        | size          |
//! | desc  | forward   | DESC | `key <= boundary`   | size + 1    | size          |
//! | desc  | backward  | ASC  | `key > boundary`    | size        | size          |
//!
//! The table is not spelled out case by case. The scan sort is the order's
//! natural sort, flipped for backward pages; the filter keeps keys ahead
//! of the boundary in that sort, inclusive going forward and exclusive
//! going backward.

use crate::models::{Direction, OrderMode};
use crate::ports::{Comparison, QueryDescriptor};

/// Probe and display queries for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPlan {
    /// Query run to fetch the page and detect whether more data follows.
    pub probe: QueryDescriptor,
    /// Same filter and sort, limited to the page size.
    pub display: QueryDescriptor,
}

impl BoundaryPlan {
    /// Whether the probe asks for one row beyond the page.
    pub fn overfetches(&self) -> bool {
        self.probe.limit > self.display.limit
    }
}

/// Plan the queries for a page.
pub fn plan(
    order_mode: OrderMode,
    direction: Direction,
    boundary: i64,
    page_size: u32,
) -> BoundaryPlan {
    let sort = direction.traversal_sort(order_mode);
    let (inclusive, probe_limit) = match direction {
        Direction::Forward => (true, page_size.saturating_add(1)),
        Direction::Backward => (false, page_size),
    };

    let probe = QueryDescriptor {
        comparison: Comparison::ahead_of(sort, inclusive),
        boundary,
        sort,
        limit: probe_limit,
    };

    BoundaryPlan {
        probe,
        display: probe.with_limit(page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::SortDirection;

    fn expect(
        mode: OrderMode,
        direction: Direction,
        sort: SortDirection,
        comparison: Comparison,
        probe_limit: u32,
    ) {
        let plan = plan(mode, direction, 7, 2);
        assert_eq!(plan.probe.sort, sort, "{mode:?}/{direction:?}");
        assert_eq!(plan.probe.comparison, comparison, "{mode:?}/{direction:?}");
        assert_eq!(plan.probe.boundary, 7);
        assert_eq!(plan.probe.limit, probe_limit, "{mode:?}/{direction:?}");
        assert_eq!(plan.display.limit, 2);
        assert_eq!(plan.display.sort, plan.probe.sort);
        assert_eq!(plan.display.comparison, plan.probe.comparison);
    }

    #[test]
    fn ascending_forward_overfetches_inclusive() {
        expect(
            OrderMode::ByKeyAscending,
            Direction::Forward,
            SortDirection::Asc,
            Comparison::Ge,
            3,
        );
    }

    #[test]
    fn ascending_backward_scans_down_exclusive() {
        expect(
            OrderMode::ByKeyAscending,
            Direction::Backward,
            SortDirection::Desc,
            Comparison::Lt,
            2,
        );
    }

    #[test]
    fn descending_forward_overfetches_inclusive() {
        expect(
            OrderMode::ByKeyDescending,
            Direction::Forward,
            SortDirection::Desc,
            Comparison::Le,
            3,
        );
    }

    #[test]
    fn descending_backward_scans_up_exclusive() {
        expect(
            OrderMode::ByKeyDescending,
            Direction::Backward,
            SortDirection::Asc,
            Comparison::Gt,
            2,
        );
    }

    #[test]
    fn only_forward_plans_overfetch() {
        let forward = plan(OrderMode::ByKeyAscending, Direction::Forward, 0, 10);
        let backward = plan(OrderMode::ByKeyAscending, Direction::Backward, 0, 10);
        assert!(forward.overfetches());
        assert!(!backward.overfetches());
    }

    #[test]
    fn probe_limit_saturates() {
        let plan = plan(OrderMode::ByKeyAscending, Direction::Forward, 0, u32::MAX);
        assert_eq!(plan.probe.limit, u32::MAX);
    }
}
