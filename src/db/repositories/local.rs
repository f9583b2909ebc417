//! In-memory repository implementation for unit testing and local
//! development.
//!
//! All state lives behind a single `RwLock`; every operation takes the lock
//! for its full duration, which gives the same per-row atomicity the SQL
//! backend provides.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::api::{BoardId, CardId, ListId};
use crate::db::models::CardRow;
use crate::db::repository::{
    BoardRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::{Board, BoardData, Card, CardPatch, CardWithListLabel, List, ListWithCards, NewCard};

#[derive(Default)]
struct Inner {
    boards: HashMap<Uuid, Board>,
    lists: HashMap<Uuid, List>,
    cards: HashMap<Uuid, CardRow>,
}

/// In-memory board repository.
#[derive(Default)]
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board directly (boards are provisioned out of band; the
    /// repository trait only covers lists and cards).
    pub fn create_board(&self, title: &str) -> Board {
        let now = Utc::now();
        let board = Board {
            id: BoardId::generate(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .boards
            .insert(board.id.value(), board.clone());
        board
    }

    /// Insert a raw card row, bypassing validation. Test hook for exercising
    /// the defensive anchor parsing on fetch.
    pub fn insert_card_row(&self, row: CardRow) {
        self.inner.write().cards.insert(row.id, row);
    }

    fn not_found(entity: &str, id: impl ToString) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("{} not found", entity),
            ErrorContext::default()
                .with_entity(entity)
                .with_entity_id(id),
        )
    }

    fn sorted_lists(inner: &Inner, board_id: Uuid) -> Vec<List> {
        let mut lists: Vec<List> = inner
            .lists
            .values()
            .filter(|l| l.board_id.value() == board_id)
            .cloned()
            .collect();
        lists.sort_by_key(|l| (l.position, l.created_at));
        lists
    }

    fn sorted_cards(inner: &Inner, list_id: Uuid) -> Vec<Card> {
        let mut rows: Vec<CardRow> = inner
            .cards
            .values()
            .filter(|c| c.list_id == list_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| (c.position, c.created_at));
        rows.into_iter().map(CardRow::into_card).collect()
    }
}

#[async_trait]
impl BoardRepository for LocalRepository {
    async fn fetch_board(&self, board_id: BoardId) -> RepositoryResult<BoardData> {
        let inner = self.inner.read();
        let board = inner
            .boards
            .get(&board_id.value())
            .cloned()
            .ok_or_else(|| Self::not_found("board", board_id))?;

        let lists = Self::sorted_lists(&inner, board_id.value())
            .into_iter()
            .map(|list| {
                let cards = Self::sorted_cards(&inner, list.id.value());
                ListWithCards { list, cards }
            })
            .collect();

        Ok(BoardData { board, lists })
    }

    async fn fetch_cards_with_labels(
        &self,
        board_id: BoardId,
    ) -> RepositoryResult<Vec<CardWithListLabel>> {
        let inner = self.inner.read();
        if !inner.boards.contains_key(&board_id.value()) {
            return Err(Self::not_found("board", board_id));
        }

        let mut out = Vec::new();
        for list in Self::sorted_lists(&inner, board_id.value()) {
            for card in Self::sorted_cards(&inner, list.id.value()) {
                out.push(CardWithListLabel {
                    card,
                    list_label: list.title.clone(),
                });
            }
        }
        Ok(out)
    }

    async fn card_count(&self, list_id: ListId) -> RepositoryResult<usize> {
        let inner = self.inner.read();
        Ok(inner
            .cards
            .values()
            .filter(|c| c.list_id == list_id.value())
            .count())
    }

    async fn create_list(
        &self,
        board_id: BoardId,
        title: &str,
        position: i32,
    ) -> RepositoryResult<List> {
        let mut inner = self.inner.write();
        if !inner.boards.contains_key(&board_id.value()) {
            return Err(Self::not_found("board", board_id));
        }
        let now = Utc::now();
        let list = List {
            id: ListId::generate(),
            board_id,
            title: title.to_string(),
            position,
            created_at: now,
            updated_at: now,
        };
        inner.lists.insert(list.id.value(), list.clone());
        Ok(list)
    }

    async fn rename_list(&self, list_id: ListId, title: &str) -> RepositoryResult<List> {
        let mut inner = self.inner.write();
        let list = inner
            .lists
            .get_mut(&list_id.value())
            .ok_or_else(|| Self::not_found("list", list_id))?;
        list.title = title.to_string();
        list.updated_at = Utc::now();
        Ok(list.clone())
    }

    async fn delete_list(&self, list_id: ListId) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        if inner.lists.remove(&list_id.value()).is_none() {
            return Err(Self::not_found("list", list_id));
        }
        inner.cards.retain(|_, c| c.list_id != list_id.value());
        Ok(())
    }

    async fn create_card(&self, new_card: NewCard) -> RepositoryResult<Card> {
        let mut inner = self.inner.write();
        if !inner.lists.contains_key(&new_card.list_id.value()) {
            return Err(Self::not_found("list", new_card.list_id));
        }
        let row = CardRow::from_new(new_card, Utc::now());
        let card = row.clone().into_card();
        inner.cards.insert(row.id, row);
        Ok(card)
    }

    async fn update_card(&self, card_id: CardId, patch: CardPatch) -> RepositoryResult<Card> {
        let mut inner = self.inner.write();
        let row = inner
            .cards
            .get_mut(&card_id.value())
            .ok_or_else(|| Self::not_found("card", card_id))?;

        let mut card = row.clone().into_card();
        patch.apply(&mut card, Utc::now());
        let mut updated = CardRow::from_card(&card);
        // Keep the list assignment and position; the patch never moves cards.
        updated.list_id = row.list_id;
        updated.position = row.position;
        *row = updated;
        Ok(row.clone().into_card())
    }

    async fn delete_card(&self, card_id: CardId) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        inner
            .cards
            .remove(&card_id.value())
            .map(|_| ())
            .ok_or_else(|| Self::not_found("card", card_id))
    }

    async fn move_card(
        &self,
        card_id: CardId,
        new_list_id: ListId,
        new_position: i32,
    ) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        if !inner.lists.contains_key(&new_list_id.value()) {
            return Err(Self::not_found("list", new_list_id));
        }
        let row = inner
            .cards
            .get_mut(&card_id.value())
            .ok_or_else(|| Self::not_found("card", card_id))?;
        row.list_id = new_list_id.value();
        row.position = new_position;
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn swap_card_positions(&self, a: CardId, b: CardId) -> RepositoryResult<()> {
        let mut inner = self.inner.write();
        let pos_a = inner
            .cards
            .get(&a.value())
            .map(|c| c.position)
            .ok_or_else(|| Self::not_found("card", a))?;
        let pos_b = inner
            .cards
            .get(&b.value())
            .map(|c| c.position)
            .ok_or_else(|| Self::not_found("card", b))?;

        let now = Utc::now();
        if let Some(card) = inner.cards.get_mut(&a.value()) {
            card.position = pos_b;
            card.updated_at = now;
        }
        if let Some(card) = inner.cards.get_mut(&b.value()) {
            card.position = pos_a;
            card.updated_at = now;
        }
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
