//! Board repository trait: the persistence contract for boards, lists and
//! cards.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{BoardId, CardId, ListId};
use crate::models::{BoardData, Card, CardPatch, CardWithListLabel, List, NewCard};

/// Repository trait for board storage.
///
/// The timeline engine only needs `fetch_cards_with_labels` and
/// `update_card`; the remaining operations are the board CRUD surface the
/// HTTP layer exposes. Per-row writes are atomic; concurrent writes to the
/// same field are last-write-wins.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    // ==================== Reads ====================

    /// Fetch a board with its lists (ordered by position) and each list's
    /// cards (ordered by position).
    async fn fetch_board(&self, board_id: BoardId) -> RepositoryResult<BoardData>;

    /// Fetch every card of a board paired with the title of its list.
    /// This is the input of the timeline aggregation pass.
    async fn fetch_cards_with_labels(
        &self,
        board_id: BoardId,
    ) -> RepositoryResult<Vec<CardWithListLabel>>;

    /// Number of cards in a list.
    async fn card_count(&self, list_id: ListId) -> RepositoryResult<usize>;

    // ==================== List CRUD ====================

    /// Create a list at the given position on a board.
    async fn create_list(
        &self,
        board_id: BoardId,
        title: &str,
        position: i32,
    ) -> RepositoryResult<List>;

    /// Rename a list.
    async fn rename_list(&self, list_id: ListId, title: &str) -> RepositoryResult<List>;

    /// Delete a list and all of its cards.
    async fn delete_list(&self, list_id: ListId) -> RepositoryResult<()>;

    // ==================== Card CRUD ====================

    /// Create a card.
    async fn create_card(&self, new_card: NewCard) -> RepositoryResult<Card>;

    /// Apply a partial update to a card, bumping its `updated_at`.
    /// The write is atomic per row; untouched fields keep their values.
    async fn update_card(&self, card_id: CardId, patch: CardPatch) -> RepositoryResult<Card>;

    /// Delete a card.
    async fn delete_card(&self, card_id: CardId) -> RepositoryResult<()>;

    /// Move a card to a new list and position (drag-and-drop).
    async fn move_card(
        &self,
        card_id: CardId,
        new_list_id: ListId,
        new_position: i32,
    ) -> RepositoryResult<()>;

    /// Swap the positions of two cards.
    async fn swap_card_positions(&self, a: CardId, b: CardId) -> RepositoryResult<()>;

    // ==================== Health ====================

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// Marker alias for the complete repository surface.
///
/// Kept as a distinct trait so additional concerns can be layered on later
/// without touching every consumer of `Arc<dyn FullRepository>`.
pub trait FullRepository: BoardRepository {}

impl<T: BoardRepository + ?Sized> FullRepository for T {}
