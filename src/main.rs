//! MemDB - A hybrid in-memory/PostgreSQL record store server
//!
//! Serves the record store over HTTP with write-back persistence.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod storage;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::CacheEngine;
use config::Config;
use storage::PostgresGateway;

/// Main entry point for the MemDB server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the PostgreSQL gateway pool
/// 4. Create the cache engine and start the maintenance loops
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. On SIGINT/SIGTERM, stop the engine (final flush) and exit
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memdb=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MemDB record store");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: db={}@{}:{}/{}, flush_interval={}s, evict_interval={}s, port={}",
        config.db.user,
        config.db.host,
        config.db.port,
        config.db.dbname,
        config.flush_interval,
        config.evict_interval,
        config.server_port
    );

    // Build the gateway pool (lazy; connections open on first use)
    let gateway = Arc::new(PostgresGateway::connect(&config.db)?);

    // Create the engine and start the flush/eviction loops
    let engine = Arc::new(CacheEngine::new(gateway, &config));
    engine.start();

    // Create router with all endpoints
    let state = AppState::new(Arc::clone(&engine));
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the maintenance loops and persist everything still dirty
    match engine.stop().await {
        Ok(flushed) => info!("Final flush persisted {} records", flushed),
        Err(e) => error!("Final flush failed, dirty records were lost: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
