//! Timeline view assembly.
//!
//! Runs the full derivation pipeline for a board: filter and order the
//! anchored cards, compute the month-aligned axis and project every derived
//! interval into renderable rows.

use crate::api::BoardId;
use crate::db::repository::{BoardRepository, RepositoryResult};
use crate::models::CardWithListLabel;
use crate::timeline::{aggregate, build_layout, compute_range, TimelineViewData};

/// Compute the timeline view from already-fetched cards.
///
/// Pure and deterministic: the same cards always produce the same view.
/// Cards without any anchor date are dropped; with no qualifying cards the
/// result is an empty row set over a degenerate axis.
pub fn compute_timeline_view(cards: Vec<CardWithListLabel>) -> TimelineViewData {
    let items = aggregate(cards);
    let range = compute_range(&items);
    build_layout(&items, &range)
}

/// Fetch a board's cards and compute its timeline view.
pub async fn get_timeline_view(
    repo: &dyn BoardRepository,
    board_id: BoardId,
) -> RepositoryResult<TimelineViewData> {
    let cards = repo.fetch_cards_with_labels(board_id).await?;
    log::debug!(
        "computing timeline for board {} from {} cards",
        board_id,
        cards.len()
    );
    Ok(compute_timeline_view(cards))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CardId, ListId};
    use crate::models::Card;
    use chrono::{NaiveDate, Utc};

    fn card_with_launch(title: &str, launch: Option<NaiveDate>) -> CardWithListLabel {
        let now = Utc::now();
        CardWithListLabel {
            card: Card {
                id: CardId::generate(),
                list_id: ListId::generate(),
                title: title.to_string(),
                status: String::new(),
                memo: String::new(),
                launch_date: launch,
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
            },
            list_label: "Contracted".to_string(),
        }
    }

    #[test]
    fn test_empty_board_yields_degenerate_view() {
        let view = compute_timeline_view(vec![]);
        assert!(view.rows.is_empty());
        assert!(view.months.is_empty());
        assert_eq!(view.range_start, view.range_end);
    }

    #[test]
    fn test_unanchored_cards_are_dropped() {
        let view = compute_timeline_view(vec![card_with_launch("no dates", None)]);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_single_launch_produces_rows_and_months() {
        let launch = NaiveDate::from_ymd_opt(2024, 6, 15);
        let view = compute_timeline_view(vec![card_with_launch("Shibuya", launch)]);

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].title, "Shibuya");
        // Launch-only card: two payments, setup, open and follow-up.
        assert_eq!(view.rows[0].bars.len(), 5);
        assert_eq!(view.months.len(), 6);
        assert_eq!(view.months[0].label, "Mar 2024");
        assert_eq!(view.months[5].label, "Aug 2024");
    }

    #[tokio::test]
    async fn test_get_timeline_view_from_repository() {
        use crate::db::repositories::LocalRepository;
        use crate::models::{AnchorKind, CardPatch, NewCard};

        let repo = LocalRepository::new();
        let board = repo.create_board("Openings");
        let list = repo.create_list(board.id, "Contracted", 0).await.unwrap();
        let card = repo
            .create_card(NewCard::titled(list.id, "Ikebukuro", 0))
            .await
            .unwrap();
        repo.update_card(
            card.id,
            CardPatch::anchor(AnchorKind::Launch, NaiveDate::from_ymd_opt(2024, 6, 15)),
        )
        .await
        .unwrap();

        let view = get_timeline_view(&repo, board.id).await.unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].list_label, "Contracted");
    }

    #[tokio::test]
    async fn test_get_timeline_view_missing_board() {
        use crate::db::repositories::LocalRepository;

        let repo = LocalRepository::new();
        let err = get_timeline_view(&repo, BoardId::generate())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
