//! Pagination services.
//!
//! - [`codec`] - Cursor token encoding and decoding
//! - [`planner`] - Keyset query planning for each order/direction pair
//! - [`resolver`] - Page resolution against an ordered data source

pub mod codec;
pub mod planner;
pub mod resolver;

pub use codec::{decode_cursor, encode_cursor};
pub use planner::{BoundaryPlan, plan};
pub use resolver::PageResolver;
