//! LINE bots API server

use axum::{
    routing::{get, post},
    Router,
};
use processor::{SweepConfig, SweepService};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod state;

#[cfg(test)]
mod routes_test;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api=debug".parse()?)
                .add_directive("processor=debug".parse()?),
        )
        .init();

    info!("🤖 Starting LINE bots API");

    // Load configuration
    let config = common::Config::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    let line = line::LineClient::new(config.webhook.channel_token.clone());

    // Start background sweep service (if enabled)
    if config.sweep_interval_secs > 0 {
        let sweep_config = SweepConfig {
            interval: Duration::from_secs(config.sweep_interval_secs),
        };
        let sweep_service = SweepService::new(pool.clone(), line.clone(), sweep_config);
        tokio::spawn(async move {
            sweep_service.run().await;
        });
        info!(
            "📡 Reminder sweep enabled (every {} seconds)",
            config.sweep_interval_secs
        );
    } else {
        info!("📡 Reminder sweep disabled (SWEEP_INTERVAL_SECS=0)");
    }

    // Create app state
    let state = Arc::new(AppState::new(config, pool, line));
    let addr = format!("{}:{}", state.config.host, state.config.port);

    let app = app(state);

    // Start server
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router; shared by main and the route tests
fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/webhook/memo", post(routes::webhooks::memo))
        .route("/webhook/reminder", post(routes::webhooks::reminder))
        .route("/api/sweep", post(routes::sweep::trigger))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
