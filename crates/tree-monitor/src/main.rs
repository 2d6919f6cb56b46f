//! Tree monitor server.

use database::Database;
use rewards::TokenCalculator;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tree_monitor::build_app;
use tree_monitor::config::Config;
use tree_monitor::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting tree monitor");

    if config.webhook_secret.is_some() {
        warn!("WEBHOOK_SECRET is set but webhook requests are not authenticated");
    }

    // Connect to database
    let db = Database::connect_with_pool_size(&config.database_url, config.pool_size).await?;
    db.migrate().await?;

    let calculator = TokenCalculator::new(config.tokens_per_reading);
    info!(
        tokens_per_reading = calculator.tokens_per_reading(),
        "Token calculator ready"
    );

    let app = build_app(AppState::new(db.clone(), calculator));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "Tree monitor listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}
