//! High-level board operations working with any repository implementation.
//!
//! These functions sit between the HTTP layer and the repository trait.
//! They validate input, delegate to the repository, and log at the
//! operation level. Prefer these over calling the repository directly.

use crate::api::{BoardId, CardId, ListId};
use crate::db::repository::{BoardRepository, RepositoryError, RepositoryResult};
use crate::models::{BoardData, Card, CardPatch, CardWithListLabel, List, NewCard};

/// Fetch a board with its lists and cards fully joined.
pub async fn fetch_board_data(
    repo: &dyn BoardRepository,
    board_id: BoardId,
) -> RepositoryResult<BoardData> {
    repo.fetch_board(board_id).await
}

/// Fetch every card of a board paired with its list title.
///
/// This is the input of the timeline pipeline; ordering follows list
/// position then card position.
pub async fn fetch_cards_with_labels(
    repo: &dyn BoardRepository,
    board_id: BoardId,
) -> RepositoryResult<Vec<CardWithListLabel>> {
    repo.fetch_cards_with_labels(board_id).await
}

/// Create a list on a board.
///
/// An empty title is rejected before touching the repository.
pub async fn create_list(
    repo: &dyn BoardRepository,
    board_id: BoardId,
    title: &str,
    position: i32,
) -> RepositoryResult<List> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RepositoryError::validation("List title must not be empty"));
    }
    let list = repo.create_list(board_id, title, position).await?;
    log::info!("created list {} on board {}", list.id, board_id);
    Ok(list)
}

/// Rename a list.
pub async fn rename_list(
    repo: &dyn BoardRepository,
    list_id: ListId,
    title: &str,
) -> RepositoryResult<List> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RepositoryError::validation("List title must not be empty"));
    }
    repo.rename_list(list_id, title).await
}

/// Delete a list and all of its cards.
pub async fn delete_list(repo: &dyn BoardRepository, list_id: ListId) -> RepositoryResult<()> {
    repo.delete_list(list_id).await?;
    log::info!("deleted list {}", list_id);
    Ok(())
}

/// Create a card at the end of a list.
///
/// The position is assigned from the current card count so new cards
/// always append.
pub async fn create_card_at_end(
    repo: &dyn BoardRepository,
    list_id: ListId,
    title: &str,
) -> RepositoryResult<Card> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RepositoryError::validation("Card title must not be empty"));
    }
    let position = repo.card_count(list_id).await? as i32;
    let card = repo
        .create_card(NewCard::titled(list_id, title, position))
        .await?;
    log::info!("created card {} in list {}", card.id, list_id);
    Ok(card)
}

/// Create a card from a full [`NewCard`] payload.
pub async fn create_card(repo: &dyn BoardRepository, new_card: NewCard) -> RepositoryResult<Card> {
    if new_card.title.trim().is_empty() {
        return Err(RepositoryError::validation("Card title must not be empty"));
    }
    repo.create_card(new_card).await
}

/// Apply a partial update to a card.
///
/// Empty patches are rejected so callers notice no-op requests.
pub async fn update_card(
    repo: &dyn BoardRepository,
    card_id: CardId,
    patch: CardPatch,
) -> RepositoryResult<Card> {
    if patch.is_empty() {
        return Err(RepositoryError::validation("Patch contains no fields"));
    }
    repo.update_card(card_id, patch).await
}

/// Delete a card.
pub async fn delete_card(repo: &dyn BoardRepository, card_id: CardId) -> RepositoryResult<()> {
    repo.delete_card(card_id).await?;
    log::info!("deleted card {}", card_id);
    Ok(())
}

/// Move a card to another list at the given position.
pub async fn move_card(
    repo: &dyn BoardRepository,
    card_id: CardId,
    new_list_id: ListId,
    new_position: i32,
) -> RepositoryResult<()> {
    repo.move_card(card_id, new_list_id, new_position).await
}

/// Swap the positions of two cards (reordering within a list).
pub async fn swap_card_positions(
    repo: &dyn BoardRepository,
    a: CardId,
    b: CardId,
) -> RepositoryResult<()> {
    if a == b {
        return Ok(());
    }
    repo.swap_card_positions(a, b).await
}

/// Check repository health.
pub async fn health_check(repo: &dyn BoardRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    #[tokio::test]
    async fn test_create_list_rejects_empty_title() {
        let repo = LocalRepository::new();
        let board = repo.create_board("b");
        let err = create_list(&repo, board.id, "   ", 0).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_card_at_end_appends() {
        let repo = LocalRepository::new();
        let board = repo.create_board("b");
        let list = create_list(&repo, board.id, "l", 0).await.unwrap();

        let first = create_card_at_end(&repo, list.id, "one").await.unwrap();
        let second = create_card_at_end(&repo, list.id, "two").await.unwrap();
        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
    }

    #[tokio::test]
    async fn test_update_card_rejects_empty_patch() {
        let repo = LocalRepository::new();
        let err = update_card(&repo, CardId::generate(), CardPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_swap_same_card_is_noop() {
        let repo = LocalRepository::new();
        let id = CardId::generate();
        // Same id never hits the repository, so a missing card is fine here.
        swap_card_positions(&repo, id, id).await.unwrap();
    }
}
