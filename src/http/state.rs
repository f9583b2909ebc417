//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::ChangeFeed;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Board change feed driving the SSE endpoint
    pub change_feed: Arc<ChangeFeed>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            change_feed: Arc::new(ChangeFeed::default()),
        }
    }

    /// Use a preconfigured change feed (e.g. a larger event buffer).
    pub fn with_change_feed(repository: Arc<dyn FullRepository>, feed: Arc<ChangeFeed>) -> Self {
        Self {
            repository,
            change_feed: feed,
        }
    }
}
