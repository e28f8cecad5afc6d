//! # memeforge-server
//!
//! REST backend for the memeforge token launcher.
//!
//! This binary provides:
//! - **Image upload** endpoint that fabricates a content-address URL for the
//!   payload (no bytes are kept)
//! - **Simulated deployment** pipeline that walks a coin record through
//!   contract assignment and the announcement cast
//! - **Creator query** endpoint listing coins by wallet address
//! - **Per-IP throttling** on the mutating endpoints
//!
//! Chain, hosting, and social collaborators are stubs: every identifier is
//! synthesized and no external service is contacted.

mod api;
mod config;
mod deploy;
mod error;
mod rate_limit;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use memeforge_store::{MemStorage, SqliteStorage, Storage};

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::deploy::Deployer;
use crate::rate_limit::Throttle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,memeforge_server=debug")),
        )
        .init();

    info!("Starting memeforge server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    let http_addr = config.http_addr;

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------

    let store: Arc<dyn Storage> = match &config.store_path {
        Some(path) => {
            info!(path = %path.display(), "using SQLite store");
            Arc::new(SqliteStorage::open_at(path)?)
        }
        None => {
            info!("using in-memory store (records do not survive restart)");
            Arc::new(MemStorage::new())
        }
    };

    let deployer = Arc::new(Deployer::new(store.clone(), config.deploy_delay));
    let throttle = Throttle::new(config.rate_limit_rps, config.rate_limit_burst);

    let app_state = AppState {
        store,
        deployer,
        throttle: throttle.clone(),
        config: Arc::new(config),
    };

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------

    // Periodic throttle cleanup (every 5 minutes, evict buckets idle >10 min)
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            throttle.purge_idle(std::time::Duration::from_secs(600)).await;
        }
    });

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
