//! Sentinel Sync - Demo Runner
//!
//! Wires the engine together against a live backend and logs every store
//! change until interrupted. Useful for watching the fallback/recovery
//! behavior without a frontend attached.

use std::sync::Arc;

use sentinel_sync::{constants, ApiClient, StatusPoller, StatusStore, SyncConfig};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let config = SyncConfig::default();
    log::info!("  Backend: {}", config.api_url);
    log::info!("  Poll interval: {:?}", config.poll_interval);

    let api = Arc::new(ApiClient::new(&config));
    let store = Arc::new(StatusStore::new());
    let poller = StatusPoller::new(api, store.clone());

    let _subscription = store.subscribe({
        let store = store.clone();
        move || {
            if let Some(err) = store.last_error() {
                log::warn!("Backend error recorded: {}", err);
                return;
            }
            let snapshot = store.snapshot();
            log::info!(
                "Snapshot updated: {} flows, {} policies, {} investigations{}",
                snapshot.active_flows.len(),
                snapshot.active_policies.len(),
                snapshot.investigations.len(),
                if store.is_demo() { " [demo]" } else { "" }
            );
        }
    });

    poller.start(config.poll_interval, true);

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }

    log::info!("Shutting down...");
    poller.stop();
}
