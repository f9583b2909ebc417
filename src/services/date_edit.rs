//! Anchor date editing.
//!
//! The timeline never stores derived windows; editing either anchor is the
//! only way to change them. An edit persists the new anchor value and the
//! next view computation picks it up.

use chrono::NaiveDate;

use crate::api::CardId;
use crate::db::repository::{BoardRepository, RepositoryResult};
use crate::models::{AnchorKind, Card, CardPatch};

/// Set or clear one anchor date on a card.
///
/// `date = None` clears the anchor. Returns the updated card; every derived
/// window for the card changes (or disappears) accordingly on the next
/// timeline computation.
pub async fn edit_anchor(
    repo: &dyn BoardRepository,
    card_id: CardId,
    kind: AnchorKind,
    date: Option<NaiveDate>,
) -> RepositoryResult<Card> {
    let card = repo
        .update_card(card_id, CardPatch::anchor(kind, date))
        .await?;
    log::info!(
        "card {}: {:?} anchor set to {:?}",
        card_id,
        kind,
        date.map(|d| d.to_string())
    );
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::NewCard;
    use crate::timeline::derive_intervals;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn seeded_repo() -> (LocalRepository, CardId) {
        let repo = LocalRepository::new();
        let board = repo.create_board("Openings");
        let list = repo.create_list(board.id, "Contracted", 0).await.unwrap();
        let card = repo
            .create_card(NewCard::titled(list.id, "Nakano store", 0))
            .await
            .unwrap();
        (repo, card.id)
    }

    #[tokio::test]
    async fn test_set_launch_anchor() {
        let (repo, card_id) = seeded_repo().await;
        let card = edit_anchor(&repo, card_id, AnchorKind::Launch, Some(d(2024, 6, 15)))
            .await
            .unwrap();
        assert_eq!(card.launch_date, Some(d(2024, 6, 15)));
    }

    #[tokio::test]
    async fn test_clear_anchor_removes_derived_windows() {
        let (repo, card_id) = seeded_repo().await;
        edit_anchor(&repo, card_id, AnchorKind::Launch, Some(d(2024, 6, 15)))
            .await
            .unwrap();
        let card = edit_anchor(&repo, card_id, AnchorKind::Launch, None)
            .await
            .unwrap();
        assert!(card.launch_date.is_none());
        assert!(derive_intervals(card.launch_date, card.construction_start_date).is_empty());
    }

    #[tokio::test]
    async fn test_edit_one_anchor_leaves_other_untouched() {
        let (repo, card_id) = seeded_repo().await;
        edit_anchor(&repo, card_id, AnchorKind::Launch, Some(d(2024, 6, 15)))
            .await
            .unwrap();
        let card = edit_anchor(
            &repo,
            card_id,
            AnchorKind::ConstructionStart,
            Some(d(2024, 3, 1)),
        )
        .await
        .unwrap();
        assert_eq!(card.launch_date, Some(d(2024, 6, 15)));
        assert_eq!(card.construction_start_date, Some(d(2024, 3, 1)));
    }

    #[tokio::test]
    async fn test_edit_missing_card() {
        let repo = LocalRepository::new();
        let err = edit_anchor(&repo, CardId::generate(), AnchorKind::Launch, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
