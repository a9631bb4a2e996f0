//! # Tempmail Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, and serves
//! the management API, the Telegram webhook, and the health endpoints from a
//! single HTTP listener.

use anyhow::Result;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tempmail_bot::config::Config;
use tempmail_bot::database::connection::DatabaseManager;
use tempmail_bot::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tempmail_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Tempmail Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Channel: {}",
        config.database_url, config.http_port, config.required_channel
    );

    // Initialize database
    info!("Initializing database connection...");
    let db = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db.run_migrations().await?;
    info!("Database initialized successfully");

    // The bot client only sends outbound requests; updates arrive via the webhook.
    let bot = Bot::new(&config.telegram_bot_token);

    let http_port = config.http_port;
    let state = AppState { db, bot, config };
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{http_port}"))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", http_port, e))?;

    info!("HTTP server starting on port {}", http_port);
    axum::serve(listener, app).await?;

    info!("Application stopped");
    Ok(())
}
