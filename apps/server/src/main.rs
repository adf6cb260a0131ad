//! # Bodega API Server
//!
//! Binary entry point: configuration, database, router, graceful shutdown.

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bodega_db::{Database, DbConfig};
use bodega_server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("Starting Bodega API server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        database = %config.database_path.display(),
        media = %config.media_dir.display(),
        "Configuration loaded"
    );

    // The media directory must exist before ServeDir mounts it
    tokio::fs::create_dir_all(&config.media_dir).await?;

    // Connect to the database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to SQLite");

    // Build the router
    let state = AppState {
        db,
        media_dir: config.media_dir.clone(),
        max_body_bytes: config.max_body_bytes,
    };
    let app = create_router(state);

    // Start the server
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
