use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{boards, cards, lists};
use crate::api::{BoardId, ListId};
use crate::db::models::CardRow;
use crate::models::{Board, List};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRowPg {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BoardRowPg> for Board {
    fn from(row: BoardRowPg) -> Self {
        Board {
            id: BoardId::new(row.id),
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListRowPg {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ListRowPg> for List {
    fn from(row: ListRowPg) -> Self {
        List {
            id: ListId::new(row.id),
            board_id: BoardId::new(row.board_id),
            title: row.title,
            position: row.position,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CardRowPg {
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

impl From<CardRowPg> for CardRow {
    fn from(row: CardRowPg) -> Self {
        CardRow {
            id: row.id,
            list_id: row.list_id,
            title: row.title,
            status: row.status,
            memo: row.memo,
            launch_date: row.launch_date,
            construction_start_date: row.construction_start_date,
            candidate_url: row.candidate_url,
            candidate_url2: row.candidate_url2,
            company_name: row.company_name,
            company_url: row.company_url,
            position: row.position,
            tracker_list_id: row.tracker_list_id,
            tracker_card_id: row.tracker_card_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<CardRow> for CardRowPg {
    fn from(row: CardRow) -> Self {
        CardRowPg {
            id: row.id,
            list_id: row.list_id,
            title: row.title,
            status: row.status,
            memo: row.memo,
            launch_date: row.launch_date,
            construction_start_date: row.construction_start_date,
            candidate_url: row.candidate_url,
            candidate_url2: row.candidate_url2,
            company_name: row.company_name,
            company_url: row.company_url,
            position: row.position,
            tracker_list_id: row.tracker_list_id,
            tracker_card_id: row.tracker_card_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Full-row card update applied inside the update transaction.
/// `treat_none_as_null` lets a patch clear an anchor back to NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cards)]
#[diesel(treat_none_as_null = true)]
pub struct CardChangeset {
    pub title: String,
    pub status: String,
    pub memo: String,
    pub launch_date: Option<String>,
    pub construction_start_date: Option<String>,
    pub candidate_url: String,
    pub candidate_url2: String,
    pub company_name: String,
    pub company_url: String,
    pub tracker_list_id: Option<String>,
    pub tracker_card_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CardChangeset {
    pub fn from_row(row: &CardRow) -> Self {
        CardChangeset {
            title: row.title.clone(),
            status: row.status.clone(),
            memo: row.memo.clone(),
            launch_date: row.launch_date.clone(),
            construction_start_date: row.construction_start_date.clone(),
            candidate_url: row.candidate_url.clone(),
            candidate_url2: row.candidate_url2.clone(),
            company_name: row.company_name.clone(),
            company_url: row.company_url.clone(),
            tracker_list_id: row.tracker_list_id.clone(),
            tracker_card_id: row.tracker_card_id.clone(),
            updated_at: row.updated_at,
        }
    }
}
