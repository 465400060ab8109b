//! Status Poller
//!
//! Background task that fetches `/status` on a fixed interval and routes
//! each outcome into the store:
//! - success: apply the real snapshot, demo flag off
//! - unreachable: apply a synthesized snapshot, demo flag on
//! - HTTP / malformed: record the error, leave the snapshot alone
//!
//! A single task awaits each fetch before taking the next tick, so two
//! status requests are never in flight together and ticks never queue up.
//! An epoch counter bumped on every `start`/`stop` invalidates cycles that
//! were already in flight when the poller was restarted; their results are
//! discarded before they can touch the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::client::{ApiError, SyncApi};
use crate::logic::demo;
use crate::logic::store::StatusStore;

/// Repeating fetch-and-reconcile driver for the snapshot store
pub struct StatusPoller<C: SyncApi + 'static> {
    api: Arc<C>,
    store: Arc<StatusStore>,
    epoch: Arc<AtomicU64>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<C: SyncApi + 'static> StatusPoller<C> {
    pub fn new(api: Arc<C>, store: Arc<StatusStore>) -> Self {
        Self {
            api,
            store,
            epoch: Arc::new(AtomicU64::new(0)),
            handle: Mutex::new(None),
        }
    }

    /// Start polling; restarts cleanly if already running
    pub fn start(&self, interval: Duration, fetch_immediately: bool) {
        self.stop();
        let my_epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let api = self.api.clone();
        let store = self.store.clone();
        let epoch = self.epoch.clone();

        let handle = tokio::spawn(async move {
            log::info!("Status poller started (interval: {:?})", interval);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // The first tick resolves immediately; consume it when the
            // caller asked to wait a full interval before fetching.
            if !fetch_immediately {
                ticker.tick().await;
            }

            loop {
                ticker.tick().await;
                if epoch.load(Ordering::SeqCst) != my_epoch {
                    break;
                }
                run_cycle(&*api, &store, &epoch, my_epoch).await;
            }
        });

        *self.handle.lock() = Some(handle);
    }

    /// Stop polling
    ///
    /// A cycle already in flight may finish its transport call, but its
    /// result is discarded by the epoch check before any store mutation.
    pub fn stop(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
            log::info!("Status poller stopped");
        }
    }

    /// Manual refetch outside the timer, same outcome routing as a tick
    pub async fn poll_once(&self) {
        let my_epoch = self.epoch.load(Ordering::SeqCst);
        run_cycle(&*self.api, &self.store, &self.epoch, my_epoch).await;
    }
}

async fn run_cycle<C: SyncApi>(
    api: &C,
    store: &StatusStore,
    epoch: &AtomicU64,
    my_epoch: u64,
) {
    let result = api.fetch_status().await;

    // The poller may have been stopped or restarted while this fetch was
    // in flight; a superseded cycle must not touch the store.
    if epoch.load(Ordering::SeqCst) != my_epoch {
        log::debug!("Discarding status result from superseded poll cycle");
        return;
    }

    match result {
        Ok(snapshot) => {
            log::debug!(
                "Status fetched: {} flows, {} policies",
                snapshot.active_flows.len(),
                snapshot.active_policies.len()
            );
            store.apply_snapshot(snapshot, false);
        }
        Err(ApiError::Unreachable(reason)) => {
            log::warn!("Backend unreachable ({}), switching to demo data", reason);
            let previous = store.snapshot();
            store.apply_snapshot(demo::synthesize(Some(&previous), Utc::now()), true);
        }
        Err(err) => {
            // Reachable-but-broken backend: keep the stale real snapshot
            log::warn!("Status fetch failed: {}", err);
            store.apply_error(err);
        }
    }
}
