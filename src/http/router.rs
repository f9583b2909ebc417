//! HTTP router configuration.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the application router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    // API v1 routes
    let api_v1 = Router::new()
        // Board views
        .route("/boards/{board_id}", get(handlers::get_board))
        .route("/boards/{board_id}/timeline", get(handlers::get_timeline))
        .route("/boards/{board_id}/events", get(handlers::board_events))
        // List CRUD
        .route("/boards/{board_id}/lists", post(handlers::create_list))
        .route(
            "/boards/{board_id}/lists/{list_id}",
            axum::routing::patch(handlers::rename_list).delete(handlers::delete_list),
        )
        // Card CRUD
        .route(
            "/boards/{board_id}/lists/{list_id}/cards",
            post(handlers::create_card),
        )
        .route(
            "/boards/{board_id}/cards/{card_id}",
            axum::routing::patch(handlers::update_card).delete(handlers::delete_card),
        )
        .route(
            "/boards/{board_id}/cards/{card_id}/anchor",
            put(handlers::set_anchor),
        )
        .route(
            "/boards/{board_id}/cards/{card_id}/move",
            post(handlers::move_card),
        )
        .route("/boards/{board_id}/cards/swap", post(handlers::swap_cards));

    // Main router
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB request body limit
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let repository = Arc::new(LocalRepository::new());
        create_router(AppState::new(repository))
    }

    #[tokio::test]
    async fn test_health_route_responds() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_board_is_not_found() {
        let uri = format!("/v1/boards/{}", uuid::Uuid::new_v4());
        let response = app()
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/v1/nonsense")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
