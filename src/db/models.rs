//! Storage row shapes shared by the repository backends.
//!
//! Anchor dates are persisted as nullable `YYYY-MM-DD` text, mirroring the
//! loosely-typed rows of the original datastore. Conversion into the domain
//! [`Card`] parses defensively: an unparseable anchor degrades to `None`
//! with a data-quality warning instead of failing the whole fetch.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::api::{CardId, ListId};
use crate::models::{Card, NewCard};

/// A card as stored, with text-typed anchor columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRow {
    pub id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    pub status: String,
    pub memo: String,
    pub launch_date: Option<String>,
    pub construction_start_date: Option<String>,
    pub candidate_url: String,
    pub candidate_url2: String,
    pub company_name: String,
    pub company_url: String,
    pub position: i32,
    pub tracker_list_id: Option<String>,
    pub tracker_card_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parse a stored anchor value, degrading bad data to `None` with a warning.
pub fn parse_anchor(card_id: Uuid, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            log::warn!(
                "card {}: ignoring unparseable {} {:?}: {}",
                card_id,
                field,
                raw,
                err
            );
            None
        }
    }
}

/// Serialize an anchor date back into its stored form.
pub fn format_anchor(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

impl CardRow {
    /// Convert into the domain card, parsing anchors defensively.
    pub fn into_card(self) -> Card {
        let launch_date = parse_anchor(self.id, "launch_date", self.launch_date.as_deref());
        let construction_start_date = parse_anchor(
            self.id,
            "construction_start_date",
            self.construction_start_date.as_deref(),
        );
        Card {
            id: CardId::new(self.id),
            list_id: ListId::new(self.list_id),
            title: self.title,
            status: self.status,
            memo: self.memo,
            launch_date,
            construction_start_date,
            candidate_url: self.candidate_url,
            candidate_url2: self.candidate_url2,
            company_name: self.company_name,
            company_url: self.company_url,
            position: self.position,
            tracker_list_id: self.tracker_list_id,
            tracker_card_id: self.tracker_card_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Row for a freshly created card. Anchors start unset.
    pub fn from_new(new_card: NewCard, now: DateTime<Utc>) -> Self {
        CardRow {
            id: Uuid::new_v4(),
            list_id: new_card.list_id.value(),
            title: new_card.title,
            status: new_card.status,
            memo: new_card.memo,
            launch_date: None,
            construction_start_date: None,
            candidate_url: new_card.candidate_url,
            candidate_url2: new_card.candidate_url2,
            company_name: new_card.company_name,
            company_url: new_card.company_url,
            position: new_card.position,
            tracker_list_id: new_card.tracker_list_id,
            tracker_card_id: new_card.tracker_card_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Row representation of a domain card.
    pub fn from_card(card: &Card) -> Self {
        CardRow {
            id: card.id.value(),
            list_id: card.list_id.value(),
            title: card.title.clone(),
            status: card.status.clone(),
            memo: card.memo.clone(),
            launch_date: format_anchor(card.launch_date),
            construction_start_date: format_anchor(card.construction_start_date),
            candidate_url: card.candidate_url.clone(),
            candidate_url2: card.candidate_url2.clone(),
            company_name: card.company_name.clone(),
            company_url: card.company_url.clone(),
            position: card.position,
            tracker_list_id: card.tracker_list_id.clone(),
            tracker_card_id: card.tracker_card_id.clone(),
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_anchor_valid() {
        let id = Uuid::new_v4();
        assert_eq!(
            parse_anchor(id, "launch_date", Some("2024-06-15")),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
    }

    #[test]
    fn test_parse_anchor_garbage_degrades_to_none() {
        let id = Uuid::new_v4();
        assert_eq!(parse_anchor(id, "launch_date", Some("not-a-date")), None);
        assert_eq!(parse_anchor(id, "launch_date", Some("2024-13-40")), None);
        assert_eq!(parse_anchor(id, "launch_date", None), None);
    }

    #[test]
    fn test_anchor_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15);
        let raw = format_anchor(date);
        assert_eq!(raw.as_deref(), Some("2024-06-15"));
        let id = Uuid::new_v4();
        assert_eq!(parse_anchor(id, "launch_date", raw.as_deref()), date);
    }

    #[test]
    fn test_row_into_card_with_bad_anchor() {
        let now = Utc::now();
        let row = CardRow {
            id: Uuid::new_v4(),
            list_id: Uuid::new_v4(),
            title: "t".to_string(),
            status: String::new(),
            memo: String::new(),
            launch_date: Some("garbage".to_string()),
            construction_start_date: Some("2024-03-01".to_string()),
            candidate_url: String::new(),
            candidate_url2: String::new(),
            company_name: String::new(),
            company_url: String::new(),
            position: 0,
            tracker_list_id: None,
            tracker_card_id: None,
            created_at: now,
            updated_at: now,
        };
        let card = row.into_card();
        assert!(card.launch_date.is_none());
        assert_eq!(
            card.construction_start_date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }
}
