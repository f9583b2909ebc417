//! Board, list and card domain types.
//!
//! Cards carry two optional anchor dates: the launch date (commercial
//! opening) and the construction-start date. Every timeline interval is
//! derived from these two fields; everything else on the card is opaque
//! payload carried through untouched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{BoardId, CardId, ListId};

/// A project board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A vertical list of cards within a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub board_id: BoardId,
    pub title: String,
    /// Ordering key within the board (lower comes first).
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single project card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub title: String,
    pub status: String,
    pub memo: String,
    /// Anchor for the commercial-opening milestone.
    pub launch_date: Option<NaiveDate>,
    /// Anchor for physical work beginning.
    pub construction_start_date: Option<NaiveDate>,
    pub candidate_url: String,
    pub candidate_url2: String,
    pub company_name: String,
    pub company_url: String,
    /// Ordering key within the list (lower comes first).
    pub position: i32,
    /// Mirrored list on the external tracker, if synced.
    pub tracker_list_id: Option<String>,
    /// Mirrored card on the external tracker, if synced.
    pub tracker_card_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Whether the card qualifies for the timeline (at least one anchor set).
    pub fn has_anchor(&self) -> bool {
        self.launch_date.is_some() || self.construction_start_date.is_some()
    }
}

/// A list together with its cards, ordered by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWithCards {
    #[serde(flatten)]
    pub list: List,
    pub cards: Vec<Card>,
}

/// A board with its fully joined lists and cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardData {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListWithCards>,
}

/// A card paired with the title of the list it currently belongs to.
///
/// This is the input shape of the timeline aggregator: the list title is
/// carried through for display grouping only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardWithListLabel {
    pub card: Card,
    pub list_label: String,
}

/// Which of the two anchor dates an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    Launch,
    ConstructionStart,
}

/// Fields for creating a new card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub list_id: ListId,
    pub title: String,
    pub position: i32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub candidate_url: String,
    #[serde(default)]
    pub candidate_url2: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_url: String,
    #[serde(default)]
    pub tracker_list_id: Option<String>,
    #[serde(default)]
    pub tracker_card_id: Option<String>,
}

impl NewCard {
    /// A card with the given title at the end of a list; other payload empty.
    pub fn titled(list_id: ListId, title: impl Into<String>, position: i32) -> Self {
        NewCard {
            list_id,
            title: title.into(),
            position,
            status: String::new(),
            memo: String::new(),
            candidate_url: String::new(),
            candidate_url2: String::new(),
            company_name: String::new(),
            company_url: String::new(),
            tracker_list_id: None,
            tracker_card_id: None,
        }
    }
}

/// Partial update for a card.
///
/// `None` leaves a field untouched. The anchor fields are double-optional so
/// that clearing a date (`Some(None)`) is distinguishable from not touching
/// it (`None`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction_start_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_url2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_list_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_card_id: Option<Option<String>>,
}

impl CardPatch {
    /// A patch touching exactly one anchor field.
    pub fn anchor(kind: AnchorKind, date: Option<NaiveDate>) -> Self {
        match kind {
            AnchorKind::Launch => CardPatch {
                launch_date: Some(date),
                ..Default::default()
            },
            AnchorKind::ConstructionStart => CardPatch {
                construction_start_date: Some(date),
                ..Default::default()
            },
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.memo.is_none()
            && self.launch_date.is_none()
            && self.construction_start_date.is_none()
            && self.candidate_url.is_none()
            && self.candidate_url2.is_none()
            && self.company_name.is_none()
            && self.company_url.is_none()
            && self.tracker_list_id.is_none()
            && self.tracker_card_id.is_none()
    }

    /// Apply the patch to a card in place, bumping `updated_at`.
    pub fn apply(&self, card: &mut Card, now: DateTime<Utc>) {
        if let Some(ref v) = self.title {
            card.title = v.clone();
        }
        if let Some(ref v) = self.status {
            card.status = v.clone();
        }
        if let Some(ref v) = self.memo {
            card.memo = v.clone();
        }
        if let Some(v) = self.launch_date {
            card.launch_date = v;
        }
        if let Some(v) = self.construction_start_date {
            card.construction_start_date = v;
        }
        if let Some(ref v) = self.candidate_url {
            card.candidate_url = v.clone();
        }
        if let Some(ref v) = self.candidate_url2 {
            card.candidate_url2 = v.clone();
        }
        if let Some(ref v) = self.company_name {
            card.company_name = v.clone();
        }
        if let Some(ref v) = self.company_url {
            card.company_url = v.clone();
        }
        if let Some(ref v) = self.tracker_list_id {
            card.tracker_list_id = v.clone();
        }
        if let Some(ref v) = self.tracker_card_id {
            card.tracker_card_id = v.clone();
        }
        card.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CardId, ListId};

    fn sample_card() -> Card {
        let now = Utc::now();
        Card {
            id: CardId::generate(),
            list_id: ListId::generate(),
            title: "Shibuya store".to_string(),
            status: String::new(),
            memo: String::new(),
            launch_date: None,
            construction_start_date: None,
            candidate_url: String::new(),
            candidate_url2: String::new(),
            company_name: String::new(),
            company_url: String::new(),
            position: 0,
            tracker_list_id: None,
            tracker_card_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_anchor_patch_touches_single_field() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let patch = CardPatch::anchor(AnchorKind::Launch, Some(date));
        assert_eq!(patch.launch_date, Some(Some(date)));
        assert!(patch.construction_start_date.is_none());
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_patch_apply_clears_anchor() {
        let mut card = sample_card();
        card.construction_start_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let patch = CardPatch::anchor(AnchorKind::ConstructionStart, None);
        let before = card.updated_at;
        patch.apply(&mut card, Utc::now());
        assert!(card.construction_start_date.is_none());
        assert!(card.updated_at >= before);
    }

    #[test]
    fn test_has_anchor() {
        let mut card = sample_card();
        assert!(!card.has_anchor());
        card.launch_date = NaiveDate::from_ymd_opt(2024, 6, 15);
        assert!(card.has_anchor());
    }

    #[test]
    fn test_empty_patch() {
        assert!(CardPatch::default().is_empty());
        assert!(!CardPatch::anchor(AnchorKind::Launch, None).is_empty());
    }
}
