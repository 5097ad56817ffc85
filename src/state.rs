//! Application state shared by all handlers.

use crate::db::DbPool;
use crate::repository::SqliteRepository;
use crate::srs::SuggestionOptions;

#[derive(Clone)]
pub struct AppState {
    /// Shared study database connection
    pub pool: DbPool,

    /// Repository view of the same connection for the suggestion engine
    pub repo: SqliteRepository,

    /// Suggestion tuning loaded at startup
    pub options: SuggestionOptions,
}

impl AppState {
    pub fn new(pool: DbPool, options: SuggestionOptions) -> Self {
        Self {
            repo: SqliteRepository::new(pool.clone()),
            pool,
            options,
        }
    }
}
