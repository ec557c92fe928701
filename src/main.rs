//! Inventory API - product inventory over HTTP
//!
//! CRUD over products with generated SKUs and a write-invalidate read cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_api::cache::{Cache, MemoryCache, RedisCache};
use inventory_api::store::SqliteProductStore;
use inventory_api::{create_router, spawn_cleanup_task, AppState, Config, ProductService};

/// Main entry point for the inventory server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the store pool and apply the schema
/// 4. Connect the cache (Redis if configured, otherwise in-process with a cleanup task)
/// 5. Create Axum router with all endpoints
/// 6. Serve until SIGINT/SIGTERM, then release the clients
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Inventory API");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_ttl={}s, redis={}, sku_max_attempts={}",
        config.server_port,
        config.cache_ttl,
        config.redis_url.is_some(),
        config.sku_max_attempts
    );

    let store = SqliteProductStore::connect(
        &config.database_url,
        config.db_max_connections,
        config.db_acquire_timeout(),
    )
    .await
    .context("failed to open product store")?;
    store
        .migrate()
        .await
        .context("failed to apply product schema")?;
    info!("Product store ready");

    let (cache, cleanup_handle): (Arc<dyn Cache>, Option<JoinHandle<()>>) = match &config.redis_url
    {
        Some(url) => {
            let cache = RedisCache::connect(url, config.cache_timeout())
                .await
                .context("failed to connect to redis cache")?;
            (Arc::new(cache) as Arc<dyn Cache>, None)
        }
        None => {
            let cache = Arc::new(MemoryCache::new());
            let handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
            info!("In-process cache initialized");
            (cache as Arc<dyn Cache>, Some(handle))
        }
    };

    let service = ProductService::new(Arc::new(store.clone()), cache)
        .with_cache_ttl(config.cache_ttl)
        .with_sku_max_attempts(config.sku_max_attempts);
    let app = create_router(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
    store.close().await;

    info!("Server shutdown complete");
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
