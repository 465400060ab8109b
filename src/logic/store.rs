//! Snapshot Store
//!
//! Single source of truth for the console's view of the backend. Holds the
//! latest snapshot, whether it is synthesized demo data, and the last
//! transport error. All mutation goes through `apply_snapshot` and
//! `apply_error`, so the snapshot and demo flag can never drift apart.

use parking_lot::RwLock;

use crate::api::client::ApiError;
use crate::api::types::StatusSnapshot;
use crate::logic::notify::{SubscriberSet, Subscription};

struct StoreState {
    snapshot: StatusSnapshot,
    demo: bool,
    last_error: Option<ApiError>,
}

/// Observable holder for the current system snapshot
pub struct StatusStore {
    state: RwLock<StoreState>,
    subscribers: SubscriberSet,
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusStore {
    /// Create a store holding the empty initial snapshot
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                snapshot: StatusSnapshot::default(),
                demo: false,
                last_error: None,
            }),
            subscribers: SubscriberSet::new(),
        }
    }

    /// Atomically replace the snapshot and demo flag, clearing any error
    pub fn apply_snapshot(&self, snapshot: StatusSnapshot, demo: bool) {
        {
            let mut state = self.state.write();
            state.snapshot = snapshot;
            state.demo = demo;
            state.last_error = None;
        }
        self.subscribers.notify();
    }

    /// Record a transport error, keeping the previous snapshot on screen
    ///
    /// Repeated identical errors do not re-notify; a poll loop hammering a
    /// broken backend would otherwise trigger a re-render every cycle.
    pub fn apply_error(&self, error: ApiError) {
        let changed = {
            let mut state = self.state.write();
            let changed = state.last_error.as_ref() != Some(&error);
            state.last_error = Some(error);
            changed
        };
        if changed {
            self.subscribers.notify();
        }
    }

    /// Register a change callback; invoked in registration order
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Current snapshot
    pub fn snapshot(&self) -> StatusSnapshot {
        self.state.read().snapshot.clone()
    }

    /// Whether the current snapshot is synthesized demo data
    pub fn is_demo(&self) -> bool {
        self.state.read().demo
    }

    /// Last transport error, if the most recent cycle failed
    pub fn last_error(&self) -> Option<ApiError> {
        self.state.read().last_error.clone()
    }
}
