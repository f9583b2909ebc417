//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer that sits between the database
//! operations and the HTTP surface. Services orchestrate repository calls
//! and implement business logic and data processing.

pub mod change_feed;
pub mod date_edit;
pub mod timeline;

pub use change_feed::{BoardEvent, BoardEventKind, ChangeFeed};
pub use date_edit::edit_anchor;
pub use timeline::{compute_timeline_view, get_timeline_view};
