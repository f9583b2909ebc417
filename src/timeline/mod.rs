//! Timeline/date-derivation engine.
//!
//! Everything in this module is pure and synchronous: given cards with up to
//! two anchor dates each, it derives the dependent date intervals, orders the
//! qualifying cards, normalizes the visible span to whole months and projects
//! dates onto a fractional horizontal axis. No I/O happens here; the service
//! layer feeds it repository data and ships the result to the renderer.
//!
//! Pipeline (leaf to root):
//!
//! ```text
//! cards ──► intervals::derive_intervals   (per-card dependent windows)
//!       ──► aggregate::aggregate          (filter + order)
//!       ──► axis::compute_range           (month-aligned visible span)
//!       ──► project::PositionProjector    (date → percent)
//!       ──► layout::build_layout          (bars + tooltips for rendering)
//! ```

pub mod aggregate;
pub mod axis;
pub mod intervals;
pub mod layout;
pub mod project;

pub use aggregate::{aggregate, TimelineItem};
pub use axis::{compute_range, AxisRange, MonthBucket};
pub use intervals::{derive_intervals, DateInterval, DerivedIntervals};
pub use layout::{build_layout, TimelineBar, TimelineRow, TimelineViewData};
pub use project::PositionProjector;
