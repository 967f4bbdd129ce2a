//! Redis Cache - HTTP front for the instrumented cache
//!
//! Serves store/get/replay and tracked page fetches over a Redis or
//! in-memory backend.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_cache::api::create_router;
use redis_cache::{
    spawn_cleanup_task, AppState, BackendKind, Config, HttpFetcher, MemoryBackend, RedisBackend,
    SharedBackend,
};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the configured backend (Redis or memory)
/// 4. Initialize the cache, flushing the backend
/// 5. Start the memory purge task when running in memory
/// 6. Serve the Axum router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Redis Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, port={}, page_count_ttl={}s",
        config.backend, config.server_port, config.page_count_ttl
    );

    let (backend, cleanup_handle): (SharedBackend, Option<JoinHandle<()>>) = match config.backend
    {
        BackendKind::Redis => {
            let redis = RedisBackend::connect(&config.redis_url)
                .await
                .context("connecting to Redis")?;
            let backend: SharedBackend = Arc::new(redis);
            (backend, None)
        }
        BackendKind::Memory => {
            let memory = MemoryBackend::new();
            let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
            info!("Background cleanup task started");
            let backend: SharedBackend = Arc::new(memory);
            (backend, Some(handle))
        }
    };

    let state = AppState::initialize(backend, Arc::new(HttpFetcher::new()), &config)
        .await
        .context("initializing cache")?;

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
