//! Application state

use common::Config;
use github::GithubClient;
use line::LineClient;
use processor::EventHandler;
use sqlx::SqlitePool;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub line: LineClient,
    pub event_handler: EventHandler,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool, line: LineClient) -> Self {
        Self::with_clients(config, pool, line, GithubClient::new())
    }

    /// State with injected clients; tests point these at mock servers
    pub fn with_clients(
        config: Config,
        pool: SqlitePool,
        line: LineClient,
        github: GithubClient,
    ) -> Self {
        let event_handler =
            EventHandler::new(config.webhook.clone(), pool.clone(), line.clone(), github);
        Self {
            config,
            pool,
            line,
            event_handler,
        }
    }
}
