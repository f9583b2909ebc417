use chrono::NaiveDate;

use planboard::db::repositories::LocalRepository;
use planboard::db::services::{create_card_at_end, create_list, update_card};
use planboard::models::CardPatch;
use planboard::services::get_timeline_view;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn set_anchors(launch: Option<NaiveDate>, cs: Option<NaiveDate>) -> CardPatch {
    CardPatch {
        launch_date: Some(launch),
        construction_start_date: Some(cs),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_empty_board_renders_empty_view() {
    let repo = LocalRepository::new();
    let board = repo.create_board("Openings");
    create_list(&repo, board.id, "Scouting", 0).await.unwrap();

    let view = get_timeline_view(&repo, board.id).await.unwrap();
    assert!(view.rows.is_empty());
    assert!(view.months.is_empty());
}

#[tokio::test]
async fn test_unanchored_cards_are_excluded() {
    let repo = LocalRepository::new();
    let board = repo.create_board("Openings");
    let list = create_list(&repo, board.id, "Scouting", 0).await.unwrap();
    create_card_at_end(&repo, list.id, "no dates yet")
        .await
        .unwrap();

    let anchored = create_card_at_end(&repo, list.id, "Shibuya store")
        .await
        .unwrap();
    update_card(
        &repo,
        anchored.id,
        set_anchors(Some(d(2024, 6, 15)), None),
    )
    .await
    .unwrap();

    let view = get_timeline_view(&repo, board.id).await.unwrap();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].card_id, anchored.id);
}

#[tokio::test]
async fn test_fully_anchored_card_bars() {
    let repo = LocalRepository::new();
    let board = repo.create_board("Openings");
    let list = create_list(&repo, board.id, "Contracted", 0).await.unwrap();
    let card = create_card_at_end(&repo, list.id, "Shinjuku store")
        .await
        .unwrap();
    update_card(
        &repo,
        card.id,
        set_anchors(Some(d(2024, 6, 15)), Some(d(2024, 3, 1))),
    )
    .await
    .unwrap();

    let view = get_timeline_view(&repo, board.id).await.unwrap();
    assert_eq!(view.rows.len(), 1);
    let labels: Vec<_> = view.rows[0].bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Payment 1",
            "Payment 2",
            "Payment 3",
            "Construction",
            "Setup",
            "Open",
            "Follow-up"
        ]
    );
    assert_eq!(view.rows[0].list_label, "Contracted");
}

#[tokio::test]
async fn test_axis_padding_and_labels() {
    let repo = LocalRepository::new();
    let board = repo.create_board("Openings");
    let list = create_list(&repo, board.id, "Contracted", 0).await.unwrap();
    let card = create_card_at_end(&repo, list.id, "c").await.unwrap();
    update_card(&repo, card.id, set_anchors(Some(d(2024, 6, 15)), None))
        .await
        .unwrap();

    let view = get_timeline_view(&repo, board.id).await.unwrap();
    // Earliest derived date is the second payment window start (Apr 15);
    // latest is the third payment end (Jul 21). The axis pads one whole
    // month on each side.
    assert_eq!(view.range_start, d(2024, 3, 1));
    assert_eq!(view.range_end, d(2024, 8, 31));
    let labels: Vec<_> = view.months.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Mar 2024", "Apr 2024", "May 2024", "Jun 2024", "Jul 2024", "Aug 2024"]
    );
}

#[tokio::test]
async fn test_construction_only_card_keeps_marker_row() {
    let repo = LocalRepository::new();
    let board = repo.create_board("Openings");
    let list = create_list(&repo, board.id, "Contracted", 0).await.unwrap();
    let card = create_card_at_end(&repo, list.id, "c").await.unwrap();
    update_card(&repo, card.id, set_anchors(None, Some(d(2024, 6, 15))))
        .await
        .unwrap();

    let view = get_timeline_view(&repo, board.id).await.unwrap();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].bars.len(), 1);
    assert_eq!(view.rows[0].bars[0].label, "Construction start");
    assert_eq!(view.rows[0].bars[0].width_percent, 0.0);
}

#[tokio::test]
async fn test_rows_are_chronological_not_board_order() {
    let repo = LocalRepository::new();
    let board = repo.create_board("Openings");
    let first_list = create_list(&repo, board.id, "Scouting", 0).await.unwrap();
    let second_list = create_list(&repo, board.id, "Contracted", 1).await.unwrap();

    // The chronologically later card sits in the earlier list.
    let late = create_card_at_end(&repo, first_list.id, "opens in autumn")
        .await
        .unwrap();
    update_card(&repo, late.id, set_anchors(Some(d(2024, 9, 1)), None))
        .await
        .unwrap();

    let early = create_card_at_end(&repo, second_list.id, "opens in summer")
        .await
        .unwrap();
    update_card(&repo, early.id, set_anchors(Some(d(2024, 6, 15)), None))
        .await
        .unwrap();

    let view = get_timeline_view(&repo, board.id).await.unwrap();
    // Rows sort by derived start date, overriding list/position order.
    assert_eq!(view.rows[0].card_id, early.id);
    assert_eq!(view.rows[1].card_id, late.id);
}

#[tokio::test]
async fn test_missing_board_is_not_found() {
    let repo = LocalRepository::new();
    let err = get_timeline_view(&repo, planboard::api::BoardId::generate())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
