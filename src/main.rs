//! Gridiron Feed server
//!
//! Serves the page managers' collections to external rendering code.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridiron_feed::fetch::ReqwestTransport;
use gridiron_feed::{create_router, AppState, Config, NflDataService};

/// Main entry point for the Gridiron Feed server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load `.env` and configuration from environment variables
/// 3. Build the data service (HTTP client, cache and preference stores)
/// 4. Start background expired-entry sweep
/// 5. Start HTTP server on configured port
/// 6. On SIGINT/SIGTERM stop live tracking and the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridiron_feed=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    info!("Starting Gridiron Feed");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_requests={} per {}ms, max_cache_items={}, season={}/{}, port={}",
        config.max_requests,
        config.reset_interval_ms,
        config.max_cache_items,
        config.season_year,
        config.season_type,
        config.server_port
    );

    let transport = ReqwestTransport::new().context("Failed to build HTTP client")?;
    let service = NflDataService::from_config(&config, Arc::new(transport))
        .context("Failed to open data stores")?;
    info!("Data service initialized");

    let cleanup_handle = service.spawn_maintenance();
    info!("Background cleanup task started");

    let app = create_router(AppState::new(service.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let stopped = service.shutdown();
    cleanup_handle.abort();
    info!("Stopped {} live trackers; shutdown complete", stopped);
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
