//! QR Redemption Service - Main Application Entry Point
//!
//! A REST API server that issues single-use QR codes tied to a user id and
//! verifies them on redemption.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, or an in-memory store
//! - **Images**: PNG QR codes via `qrcode` + `image`
//! - **Format**: JSON requests/responses (PNG for generation)
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Connect the store (pool + migrations for PostgreSQL)
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

use qr_redemption_server::{app, config, middleware, store};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!(
        backend = ?config.store_backend,
        created_at_policy = ?config.created_at_policy,
        redemption_mode = ?config.redemption_mode,
        "Configuration loaded"
    );

    let store = store::connect(&config).await?;
    store.ping().await?;
    tracing::info!("Store ready");

    let app = app::router(app::AppState::new(store, config.qr_image_size))
        .layer(middleware::cors::cors_layer(&config.cors_allowed_origins)?);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
