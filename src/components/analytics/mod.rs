//! Stateless views over a snapshot of order records.
//!
//! Every function here is a pure function of its inputs. None of them fail: empty
//! inputs, unknown field names and windows with no data all yield empty or zero results.

pub mod breakdown;

pub mod fields;

pub mod filters;

pub mod granularity;

pub mod overview;

pub mod timeline;

pub mod window;

pub use breakdown::{compute_breakdown, BreakdownPoint, BreakdownRequest};
pub use fields::{axis_options, breakdown_options, CategoryField, FieldOption, NumericField};
pub use filters::{
    compute_filter_options, compute_table, paginate, FilterOptions, FilterSelection, Page,
    TableFilters,
};
pub use granularity::Granularity;
pub use overview::{compute_overview, Overview};
pub use timeline::{compute_timeline, TimelineBucket};
pub use window::DateWindow;
