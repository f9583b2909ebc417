//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Domain and timeline types already derive Serialize/Deserialize and are
//! re-exported here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    AxisRange, BoardId, CardId, DateInterval, DerivedIntervals, ListId, MonthBucket, TimelineBar,
    TimelineRow, TimelineViewData,
};
pub use crate::models::{AnchorKind, Board, BoardData, Card, CardPatch, List, ListWithCards};
pub use crate::services::{BoardEvent, BoardEventKind};

/// Request body for creating a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
    /// Ordering key; appended after existing lists when omitted.
    #[serde(default)]
    pub position: Option<i32>,
}

/// Request body for renaming a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameListRequest {
    pub title: String,
}

/// Request body for creating a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub title: String,
}

/// Request body for setting or clearing an anchor date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorRequest {
    pub kind: AnchorKind,
    /// `null` clears the anchor.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Request body for moving a card to another list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCardRequest {
    pub list_id: ListId,
    pub position: i32,
}

/// Request body for swapping the positions of two cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapCardsRequest {
    pub a: CardId,
    pub b: CardId,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connectivity
    pub database: String,
}
