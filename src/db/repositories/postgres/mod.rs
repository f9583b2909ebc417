//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task;
use uuid::Uuid;

use crate::api::{BoardId, CardId, ListId};
use crate::db::models::CardRow;
use crate::db::repository::{
    BoardRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::{Board, BoardData, Card, CardPatch, CardWithListLabel, List, ListWithCards, NewCard};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
///
/// This repository implementation provides:
/// - Connection pooling with configurable limits
/// - Automatic retry for transient failures
/// - Health monitoring and statistics
/// - Automatic schema migrations
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection(e.to_string()).with_operation("create_pool")
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection(e.to_string())
                    .with_operation("get_connection_for_migrations")
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal(format!("Migration failed: {}", e))
                .with_operation("run_migrations")
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times when a retryable error occurs
    /// (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection(e.to_string())
                            .with_operation("get_connection");
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(format!("Task join error: {}", e))
                .with_operation("spawn_blocking")
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Get detailed health information.
    ///
    /// Returns a tuple of (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn not_found(entity: &str, id: Uuid) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("{} not found", entity),
        ErrorContext::default()
            .with_entity(entity)
            .with_entity_id(id),
    )
}

fn load_board_row(conn: &mut PgConnection, board_id: Uuid) -> RepositoryResult<Board> {
    boards::table
        .filter(boards::id.eq(board_id))
        .select(BoardRowPg::as_select())
        .first::<BoardRowPg>(conn)
        .optional()
        .map_err(map_diesel_error)?
        .map(Board::from)
        .ok_or_else(|| not_found("board", board_id))
}

fn load_lists_for_board(conn: &mut PgConnection, board_id: Uuid) -> RepositoryResult<Vec<List>> {
    let rows = lists::table
        .filter(lists::board_id.eq(board_id))
        .select(ListRowPg::as_select())
        .order((lists::position.asc(), lists::created_at.asc()))
        .load::<ListRowPg>(conn)
        .map_err(map_diesel_error)?;
    Ok(rows.into_iter().map(List::from).collect())
}

fn load_cards_for_list(conn: &mut PgConnection, list_id: Uuid) -> RepositoryResult<Vec<Card>> {
    let rows = cards::table
        .filter(cards::list_id.eq(list_id))
        .select(CardRowPg::as_select())
        .order((cards::position.asc(), cards::created_at.asc()))
        .load::<CardRowPg>(conn)
        .map_err(map_diesel_error)?;
    Ok(rows
        .into_iter()
        .map(|row| CardRow::from(row).into_card())
        .collect())
}

#[async_trait]
impl BoardRepository for PostgresRepository {
    async fn fetch_board(&self, board_id: BoardId) -> RepositoryResult<BoardData> {
        self.with_conn(move |conn| {
            let board = load_board_row(conn, board_id.value())?;
            let mut out = Vec::new();
            for list in load_lists_for_board(conn, board_id.value())? {
                let cards = load_cards_for_list(conn, list.id.value())?;
                out.push(ListWithCards { list, cards });
            }
            Ok(BoardData { board, lists: out })
        })
        .await
    }

    async fn fetch_cards_with_labels(
        &self,
        board_id: BoardId,
    ) -> RepositoryResult<Vec<CardWithListLabel>> {
        self.with_conn(move |conn| {
            // Existence check so a missing board surfaces as NotFound rather
            // than an empty timeline.
            load_board_row(conn, board_id.value())?;

            let mut out = Vec::new();
            for list in load_lists_for_board(conn, board_id.value())? {
                for card in load_cards_for_list(conn, list.id.value())? {
                    out.push(CardWithListLabel {
                        card,
                        list_label: list.title.clone(),
                    });
                }
            }
            Ok(out)
        })
        .await
    }

    async fn card_count(&self, list_id: ListId) -> RepositoryResult<usize> {
        self.with_conn(move |conn| {
            use diesel::dsl::count_star;
            let count: i64 = cards::table
                .filter(cards::list_id.eq(list_id.value()))
                .select(count_star())
                .first(conn)
                .map_err(map_diesel_error)?;
            Ok(count as usize)
        })
        .await
    }

    async fn create_list(
        &self,
        board_id: BoardId,
        title: &str,
        position: i32,
    ) -> RepositoryResult<List> {
        let title = title.to_string();
        self.with_conn(move |conn| {
            load_board_row(conn, board_id.value())?;

            let now = Utc::now();
            let row = ListRowPg {
                id: Uuid::new_v4(),
                board_id: board_id.value(),
                title: title.clone(),
                position,
                created_at: now,
                updated_at: now,
            };
            let inserted: ListRowPg = diesel::insert_into(lists::table)
                .values(&row)
                .returning(ListRowPg::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;
            Ok(List::from(inserted))
        })
        .await
    }

    async fn rename_list(&self, list_id: ListId, title: &str) -> RepositoryResult<List> {
        let title = title.to_string();
        self.with_conn(move |conn| {
            let updated: Option<ListRowPg> = diesel::update(
                lists::table.filter(lists::id.eq(list_id.value())),
            )
            .set((lists::title.eq(&title), lists::updated_at.eq(Utc::now())))
            .returning(ListRowPg::as_returning())
            .get_result(conn)
            .optional()
            .map_err(map_diesel_error)?;

            updated
                .map(List::from)
                .ok_or_else(|| not_found("list", list_id.value()))
        })
        .await
    }

    async fn delete_list(&self, list_id: ListId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            // Cards cascade at the schema level; the explicit delete keeps the
            // behavior identical even if the constraint is relaxed.
            conn.transaction(|tx| {
                diesel::delete(cards::table.filter(cards::list_id.eq(list_id.value())))
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                let deleted = diesel::delete(lists::table.filter(lists::id.eq(list_id.value())))
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                if deleted == 0 {
                    return Err(not_found("list", list_id.value()));
                }
                Ok(())
            })
        })
        .await
    }

    async fn create_card(&self, new_card: NewCard) -> RepositoryResult<Card> {
        self.with_conn(move |conn| {
            let list_exists: i64 = lists::table
                .filter(lists::id.eq(new_card.list_id.value()))
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;
            if list_exists == 0 {
                return Err(not_found("list", new_card.list_id.value()));
            }

            let row = CardRowPg::from(CardRow::from_new(new_card.clone(), Utc::now()));
            let inserted: CardRowPg = diesel::insert_into(cards::table)
                .values(&row)
                .returning(CardRowPg::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;
            Ok(CardRow::from(inserted).into_card())
        })
        .await
    }

    async fn update_card(&self, card_id: CardId, patch: CardPatch) -> RepositoryResult<Card> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let existing: CardRowPg = cards::table
                    .filter(cards::id.eq(card_id.value()))
                    .select(CardRowPg::as_select())
                    .first(tx)
                    .optional()
                    .map_err(map_diesel_error)?
                    .ok_or_else(|| not_found("card", card_id.value()))?;

                let mut card = CardRow::from(existing).into_card();
                patch.apply(&mut card, Utc::now());
                let changeset = CardChangeset::from_row(&CardRow::from_card(&card));

                let updated: CardRowPg =
                    diesel::update(cards::table.filter(cards::id.eq(card_id.value())))
                        .set(&changeset)
                        .returning(CardRowPg::as_returning())
                        .get_result(tx)
                        .map_err(map_diesel_error)?;

                Ok(CardRow::from(updated).into_card())
            })
        })
        .await
    }

    async fn delete_card(&self, card_id: CardId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(cards::table.filter(cards::id.eq(card_id.value())))
                .execute(conn)
                .map_err(map_diesel_error)?;
            if deleted == 0 {
                return Err(not_found("card", card_id.value()));
            }
            Ok(())
        })
        .await
    }

    async fn move_card(
        &self,
        card_id: CardId,
        new_list_id: ListId,
        new_position: i32,
    ) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let list_exists: i64 = lists::table
                    .filter(lists::id.eq(new_list_id.value()))
                    .count()
                    .get_result(tx)
                    .map_err(map_diesel_error)?;
                if list_exists == 0 {
                    return Err(not_found("list", new_list_id.value()));
                }

                let updated = diesel::update(cards::table.filter(cards::id.eq(card_id.value())))
                    .set((
                        cards::list_id.eq(new_list_id.value()),
                        cards::position.eq(new_position),
                        cards::updated_at.eq(Utc::now()),
                    ))
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                if updated == 0 {
                    return Err(not_found("card", card_id.value()));
                }
                Ok(())
            })
        })
        .await
    }

    async fn swap_card_positions(&self, a: CardId, b: CardId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let pos_a: i32 = cards::table
                    .filter(cards::id.eq(a.value()))
                    .select(cards::position)
                    .first(tx)
                    .optional()
                    .map_err(map_diesel_error)?
                    .ok_or_else(|| not_found("card", a.value()))?;
                let pos_b: i32 = cards::table
                    .filter(cards::id.eq(b.value()))
                    .select(cards::position)
                    .first(tx)
                    .optional()
                    .map_err(map_diesel_error)?
                    .ok_or_else(|| not_found("card", b.value()))?;

                let now = Utc::now();
                diesel::update(cards::table.filter(cards::id.eq(a.value())))
                    .set((cards::position.eq(pos_b), cards::updated_at.eq(now)))
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                diesel::update(cards::table.filter(cards::id.eq(b.value())))
                    .set((cards::position.eq(pos_a), cards::updated_at.eq(now)))
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                Ok(())
            })
        })
        .await
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }
}
