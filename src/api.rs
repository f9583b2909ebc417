//! Public API surface for the planboard backend.
//!
//! This file consolidates the identifier newtypes and re-exports the DTO
//! types produced by the timeline engine. All types derive
//! Serialize/Deserialize for JSON serialization.

pub use crate::timeline::aggregate::TimelineItem;
pub use crate::timeline::axis::AxisRange;
pub use crate::timeline::axis::MonthBucket;
pub use crate::timeline::intervals::DateInterval;
pub use crate::timeline::intervals::DerivedIntervals;
pub use crate::timeline::layout::TimelineBar;
pub use crate::timeline::layout::TimelineRow;
pub use crate::timeline::layout::TimelineViewData;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Board identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardId(pub Uuid);

/// List identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListId(pub Uuid);

/// Card identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub Uuid);

impl BoardId {
    pub fn new(value: Uuid) -> Self {
        BoardId(value)
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        BoardId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl ListId {
    pub fn new(value: Uuid) -> Self {
        ListId(value)
    }

    pub fn generate() -> Self {
        ListId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl CardId {
    pub fn new(value: Uuid) -> Self {
        CardId(value)
    }

    pub fn generate() -> Self {
        CardId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BoardId> for Uuid {
    fn from(id: BoardId) -> Self {
        id.0
    }
}
impl From<ListId> for Uuid {
    fn from(id: ListId) -> Self {
        id.0
    }
}
impl From<CardId> for Uuid {
    fn from(id: CardId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_roundtrip() {
        let raw = Uuid::new_v4();
        let id = CardId::new(raw);
        assert_eq!(id.value(), raw);
        assert_eq!(Uuid::from(id), raw);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(CardId::generate(), CardId::generate());
        assert_ne!(ListId::generate(), ListId::generate());
    }

    #[test]
    fn test_display_matches_uuid() {
        let raw = Uuid::new_v4();
        assert_eq!(BoardId::new(raw).to_string(), raw.to_string());
    }
}
