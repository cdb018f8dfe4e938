//! Taskboard API server.
//!
//! An axum REST server exposing task CRUD plus sample-data seeding over a
//! pluggable task store.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:3001 with a volatile store
//! cargo run --bin taskboard-server
//!
//! # Persist tasks to a snapshot file
//! cargo run --bin taskboard-server -- --store-url file:///tmp/tasks.bin
//!
//! # Or via environment variables
//! PORT=8080 TASKBOARD_STORE_URL=/tmp/tasks.bin cargo run --bin taskboard-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskboard_server::config::{ServerCliArgs, ServerConfig};
use taskboard_server::routes;
use taskboard_server::service::TaskService;
use taskboard_server::store::TaskStore;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = match TaskStore::open(&config.store_url).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(url = %config.store_url, error = %e, "failed to open task store");
            std::process::exit(1);
        }
    };
    tracing::info!(
        url = %config.store_url,
        snapshot = ?store.snapshot_path(),
        "task store opened"
    );

    let state = Arc::new(TaskService::new(store));
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown requested");
    };

    match routes::start_server_with_shutdown(&config.bind_addr, Arc::clone(&state), shutdown).await
    {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "api server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "api server task failed");
            }
        }
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "failed to start api server");
            std::process::exit(1);
        }
    }

    match Arc::try_unwrap(state) {
        Ok(service) => {
            if let Err(e) = service.into_store().close().await {
                tracing::error!(error = %e, "failed to close task store");
                std::process::exit(1);
            }
            tracing::info!("task store closed");
        }
        Err(_) => tracing::warn!("task store still shared at shutdown, skipping close"),
    }
}
