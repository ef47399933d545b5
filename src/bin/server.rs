//! Skyview HTTP Server Binary
//!
//! Serves observation batches and streams over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin skyview-server
//!
//! # With a config file and a frame cache
//! SKYVIEW_CONFIG=skyview.toml FRAME_CACHE_CAPACITY=50000 cargo run --bin skyview-server
//! ```
//!
//! # Environment Variables
//!
//! - `SKYVIEW_CONFIG`: TOML config file (optional)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `FRAME_TIMEOUT_MS`: Per-frame streaming budget (default: 5000)
//! - `SSE_KEEP_ALIVE_SECS`: Keep-alive interval (default: 15)
//! - `FRAME_CACHE_CAPACITY`: Cached frames, 0 disables (default: 0)
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skyview::config::ServerConfig;
use skyview::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Skyview HTTP Server");

    let config = ServerConfig::load()?;
    info!(
        frame_timeout_ms = config.frame_timeout_ms,
        keep_alive_secs = config.keep_alive_secs,
        cache_capacity = config.cache_capacity,
        "Configuration loaded"
    );

    let addr: SocketAddr = config.bind_address().parse()?;
    let state = AppState::new(config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{} (stream: /v1/observations/stream)", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C. Open event streams are dropped, which cancels them.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
