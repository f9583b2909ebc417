//! External task-tracker mirroring.
//!
//! Boards can optionally mirror their lists and cards to a hosted tracker
//! service so field staff working from that tool see the same state. Local
//! rows store the remote identifiers (`tracker_list_id`, `tracker_card_id`);
//! this module owns the HTTP client that keeps the remote side in step.
//!
//! Mirroring is best-effort: local mutations never fail because the remote
//! call did.

mod client;

pub use client::{SyncError, TrackerAttachment, TrackerCard, TrackerClient, TrackerList};
