//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Mutating handlers publish to the
//! board change feed after the repository write succeeds.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use uuid::Uuid;

use super::dto::{
    AnchorRequest, CreateCardRequest, CreateListRequest, HealthResponse, MoveCardRequest,
    RenameListRequest, SwapCardsRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{BoardId, CardId, ListId};
use crate::db::services as db_services;
use crate::models::{BoardData, Card, CardPatch, List};
use crate::services::{self, BoardEvent, BoardEventKind};
use crate::timeline::TimelineViewData;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Publish a change event, deduplicated against the board snapshot.
///
/// The snapshot fetch failing must not fail the request; the mutation
/// already happened, so fall back to publishing unconditionally.
async fn notify(state: &AppState, event: BoardEvent) {
    match state.repository.fetch_board(event.board_id).await {
        Ok(snapshot) => {
            state.change_feed.publish_if_changed(event, &snapshot);
        }
        Err(err) => {
            log::warn!(
                "board {}: snapshot fetch for change feed failed: {}",
                event.board_id,
                err
            );
            state.change_feed.publish(event);
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Board Views
// =============================================================================

/// GET /v1/boards/{board_id}
///
/// Full board with lists and cards, ordered by position.
pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> HandlerResult<BoardData> {
    let data =
        db_services::fetch_board_data(state.repository.as_ref(), BoardId::new(board_id)).await?;
    Ok(Json(data))
}

/// GET /v1/boards/{board_id}/timeline
///
/// Derived timeline view for a board.
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> HandlerResult<TimelineViewData> {
    let data =
        services::get_timeline_view(state.repository.as_ref(), BoardId::new(board_id)).await?;
    Ok(Json(data))
}

/// GET /v1/boards/{board_id}/events
///
/// Stream board change events via Server-Sent Events (SSE).
pub async fn board_events(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let board_id = BoardId::new(board_id);
    // Verify the board exists before holding a stream open for it.
    state.repository.fetch_board(board_id).await?;

    let mut receiver = state.change_feed.subscribe();
    let stream = async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(event) if event.board_id == board_id => {
                    let data = serde_json::to_string(&event).unwrap_or_default();
                    yield Ok(Event::default().event("change").data(data));
                }
                // Event for another board; keep listening.
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    // The client fell behind; tell it to refetch once rather
                    // than replaying the lost events.
                    log::warn!("board {}: subscriber lagged by {} events", board_id, skipped);
                    yield Ok(Event::default().event("resync").data("{}"));
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

// =============================================================================
// List CRUD
// =============================================================================

/// POST /v1/boards/{board_id}/lists
pub async fn create_list(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(request): Json<CreateListRequest>,
) -> HandlerResult<List> {
    let board_id = BoardId::new(board_id);
    let position = match request.position {
        Some(p) => p,
        None => {
            let board = db_services::fetch_board_data(state.repository.as_ref(), board_id).await?;
            board.lists.len() as i32
        }
    };
    let list =
        db_services::create_list(state.repository.as_ref(), board_id, &request.title, position)
            .await?;

    notify(
        &state,
        BoardEvent::list(board_id, BoardEventKind::ListCreated, list.id),
    )
    .await;
    Ok(Json(list))
}

/// PATCH /v1/boards/{board_id}/lists/{list_id}
pub async fn rename_list(
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<RenameListRequest>,
) -> HandlerResult<List> {
    let board_id = BoardId::new(board_id);
    let list =
        db_services::rename_list(state.repository.as_ref(), ListId::new(list_id), &request.title)
            .await?;

    notify(
        &state,
        BoardEvent::list(board_id, BoardEventKind::ListRenamed, list.id),
    )
    .await;
    Ok(Json(list))
}

/// DELETE /v1/boards/{board_id}/lists/{list_id}
pub async fn delete_list(
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
) -> Result<axum::http::StatusCode, AppError> {
    let board_id = BoardId::new(board_id);
    let list_id = ListId::new(list_id);
    db_services::delete_list(state.repository.as_ref(), list_id).await?;

    notify(
        &state,
        BoardEvent::list(board_id, BoardEventKind::ListDeleted, list_id),
    )
    .await;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

// =============================================================================
// Card CRUD
// =============================================================================

/// POST /v1/boards/{board_id}/lists/{list_id}/cards
pub async fn create_card(
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreateCardRequest>,
) -> HandlerResult<Card> {
    let board_id = BoardId::new(board_id);
    let card = db_services::create_card_at_end(
        state.repository.as_ref(),
        ListId::new(list_id),
        &request.title,
    )
    .await?;

    notify(
        &state,
        BoardEvent::card(board_id, BoardEventKind::CardCreated, card.id),
    )
    .await;
    Ok(Json(card))
}

/// PATCH /v1/boards/{board_id}/cards/{card_id}
pub async fn update_card(
    State(state): State<AppState>,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<CardPatch>,
) -> HandlerResult<Card> {
    let board_id = BoardId::new(board_id);
    let card =
        db_services::update_card(state.repository.as_ref(), CardId::new(card_id), patch).await?;

    notify(
        &state,
        BoardEvent::card(board_id, BoardEventKind::CardUpdated, card.id),
    )
    .await;
    Ok(Json(card))
}

/// DELETE /v1/boards/{board_id}/cards/{card_id}
pub async fn delete_card(
    State(state): State<AppState>,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
) -> Result<axum::http::StatusCode, AppError> {
    let board_id = BoardId::new(board_id);
    let card_id = CardId::new(card_id);
    db_services::delete_card(state.repository.as_ref(), card_id).await?;

    notify(
        &state,
        BoardEvent::card(board_id, BoardEventKind::CardDeleted, card_id),
    )
    .await;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// PUT /v1/boards/{board_id}/cards/{card_id}/anchor
///
/// Set or clear one of the two anchor dates driving the timeline.
pub async fn set_anchor(
    State(state): State<AppState>,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<AnchorRequest>,
) -> HandlerResult<Card> {
    let board_id = BoardId::new(board_id);
    let card = services::edit_anchor(
        state.repository.as_ref(),
        CardId::new(card_id),
        request.kind,
        request.date,
    )
    .await?;

    notify(
        &state,
        BoardEvent::card(board_id, BoardEventKind::CardUpdated, card.id),
    )
    .await;
    Ok(Json(card))
}

/// POST /v1/boards/{board_id}/cards/{card_id}/move
pub async fn move_card(
    State(state): State<AppState>,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<MoveCardRequest>,
) -> Result<axum::http::StatusCode, AppError> {
    let board_id = BoardId::new(board_id);
    let card_id = CardId::new(card_id);
    db_services::move_card(
        state.repository.as_ref(),
        card_id,
        request.list_id,
        request.position,
    )
    .await?;

    notify(
        &state,
        BoardEvent::card(board_id, BoardEventKind::CardMoved, card_id),
    )
    .await;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// POST /v1/boards/{board_id}/cards/swap
pub async fn swap_cards(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(request): Json<SwapCardsRequest>,
) -> Result<axum::http::StatusCode, AppError> {
    let board_id = BoardId::new(board_id);
    db_services::swap_card_positions(state.repository.as_ref(), request.a, request.b).await?;

    notify(
        &state,
        BoardEvent::card(board_id, BoardEventKind::CardsReordered, request.a),
    )
    .await;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
