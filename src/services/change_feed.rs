//! Board change feed.
//!
//! Mutations publish typed events here instead of having every client
//! re-fetch the whole board on a timer. Subscribers receive the event,
//! decide whether it affects their view and fetch only then. Snapshot
//! checksums suppress events that carry no observable change (a patch that
//! rewrote a row to the same values, a swap of a card with itself).
//!
//! Built on `tokio::sync::broadcast`: slow subscribers lag and drop the
//! oldest events rather than blocking publishers.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::{BoardId, CardId, ListId};
use crate::db::checksum::calculate_checksum;
use crate::models::BoardData;

/// What happened on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardEventKind {
    ListCreated,
    ListRenamed,
    ListDeleted,
    CardCreated,
    CardUpdated,
    CardDeleted,
    CardMoved,
    CardsReordered,
}

/// One published change on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEvent {
    pub board_id: BoardId,
    pub kind: BoardEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
}

impl BoardEvent {
    pub fn list(board_id: BoardId, kind: BoardEventKind, list_id: ListId) -> Self {
        BoardEvent {
            board_id,
            kind,
            list_id: Some(list_id),
            card_id: None,
        }
    }

    pub fn card(board_id: BoardId, kind: BoardEventKind, card_id: CardId) -> Self {
        BoardEvent {
            board_id,
            kind,
            list_id: None,
            card_id: Some(card_id),
        }
    }
}

/// Broadcast hub for board events.
pub struct ChangeFeed {
    sender: broadcast::Sender<BoardEvent>,
    // Last published snapshot checksum per board, for dedupe.
    seen: Mutex<HashMap<BoardId, String>>,
}

impl ChangeFeed {
    /// Create a feed buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        ChangeFeed {
            sender,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish an event unconditionally.
    ///
    /// A send error only means nobody is listening right now; that is not a
    /// failure.
    pub fn publish(&self, event: BoardEvent) {
        log::debug!("publishing {:?} for board {}", event.kind, event.board_id);
        let _ = self.sender.send(event);
    }

    /// Publish an event unless the board snapshot is unchanged since the
    /// last published event for that board.
    ///
    /// Returns `true` when the event was published.
    pub fn publish_if_changed(&self, event: BoardEvent, snapshot: &BoardData) -> bool {
        let serialized = match serde_json::to_string(snapshot) {
            Ok(s) => s,
            Err(err) => {
                // Serialization failure must not drop the notification.
                log::warn!("board {}: snapshot serialization failed: {}", event.board_id, err);
                self.publish(event);
                return true;
            }
        };
        let checksum = calculate_checksum(&serialized);

        let mut seen = self.seen.lock();
        match seen.get(&event.board_id) {
            Some(previous) if *previous == checksum => {
                log::debug!(
                    "board {}: snapshot unchanged, suppressing {:?}",
                    event.board_id,
                    event.kind
                );
                false
            }
            _ => {
                seen.insert(event.board_id, checksum);
                drop(seen);
                self.publish(event);
                true
            }
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::BoardRepository;
    use crate::models::NewCard;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let feed = ChangeFeed::default();
        let mut rx = feed.subscribe();

        let board_id = BoardId::generate();
        let card_id = CardId::generate();
        feed.publish(BoardEvent::card(board_id, BoardEventKind::CardCreated, card_id));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, BoardEventKind::CardCreated);
        assert_eq!(event.board_id, board_id);
        assert_eq!(event.card_id, Some(card_id));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let feed = ChangeFeed::default();
        feed.publish(BoardEvent::list(
            BoardId::generate(),
            BoardEventKind::ListDeleted,
            ListId::generate(),
        ));
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_unchanged_snapshot_is_suppressed() {
        let repo = LocalRepository::new();
        let board = repo.create_board("Openings");
        let list = repo.create_list(board.id, "Contracted", 0).await.unwrap();
        let snapshot = repo.fetch_board(board.id).await.unwrap();

        let feed = ChangeFeed::default();
        let event = BoardEvent::list(board.id, BoardEventKind::ListRenamed, list.id);

        assert!(feed.publish_if_changed(event.clone(), &snapshot));
        assert!(!feed.publish_if_changed(event, &snapshot));
    }

    #[tokio::test]
    async fn test_changed_snapshot_is_published() {
        let repo = LocalRepository::new();
        let board = repo.create_board("Openings");
        let list = repo.create_list(board.id, "Contracted", 0).await.unwrap();

        let feed = ChangeFeed::default();
        let first = repo.fetch_board(board.id).await.unwrap();
        assert!(feed.publish_if_changed(
            BoardEvent::list(board.id, BoardEventKind::ListCreated, list.id),
            &first
        ));

        let card = repo
            .create_card(NewCard::titled(list.id, "c", 0))
            .await
            .unwrap();
        let second = repo.fetch_board(board.id).await.unwrap();
        assert!(feed.publish_if_changed(
            BoardEvent::card(board.id, BoardEventKind::CardCreated, card.id),
            &second
        ));
    }
}
