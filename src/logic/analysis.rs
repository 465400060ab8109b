//! Vanguard Analysis Desk
//!
//! One-shot, on-demand deep analysis requests scoped to a single flow.
//! Each target keeps a monotonically increasing token; a response is only
//! applied if its token is still current, so a reply from a superseded
//! request is discarded silently instead of clobbering fresher state.
//! Duplicate triggers while a request is in flight coalesce into the
//! existing one; `force_request` re-triggers under the same token rule.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::api::client::{ApiError, SyncApi};
use crate::api::types::VanguardReport;
use crate::logic::notify::{SubscriberSet, Subscription};

/// Observable per-flow analysis state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSlot {
    pub loading: bool,
    pub report: Option<VanguardReport>,
    pub error: Option<ApiError>,
}

/// Coordinator for on-demand Vanguard analyses
pub struct AnalysisDesk<C: SyncApi + 'static> {
    api: Arc<C>,
    slots: RwLock<HashMap<String, AnalysisSlot>>,
    tokens: Mutex<HashMap<String, u64>>,
    focused: RwLock<Option<String>>,
    subscribers: SubscriberSet,
}

impl<C: SyncApi + 'static> AnalysisDesk<C> {
    pub fn new(api: Arc<C>) -> Self {
        Self {
            api,
            slots: RwLock::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            focused: RwLock::new(None),
            subscribers: SubscriberSet::new(),
        }
    }

    /// Current observable state for a flow
    pub fn slot(&self, flow_id: &str) -> AnalysisSlot {
        self.slots.read().get(flow_id).cloned().unwrap_or_default()
    }

    /// Flow currently under investigation, if any
    pub fn focused(&self) -> Option<String> {
        self.focused.read().clone()
    }

    /// Switch the flow under investigation
    ///
    /// The new target starts from a clean slot: not loading, no report, no
    /// error. Its token is bumped so a reply from any earlier request for
    /// the same flow is discarded instead of repopulating the fresh slot.
    pub fn focus(&self, flow_id: &str) {
        *self.focused.write() = Some(flow_id.to_string());
        *self.tokens.lock().entry(flow_id.to_string()).or_insert(0) += 1;
        self.slots
            .write()
            .insert(flow_id.to_string(), AnalysisSlot::default());
        self.subscribers.notify();
    }

    /// Trigger analysis for a flow; a no-op while one is already in flight
    pub fn request(self: &Arc<Self>, flow_id: &str) {
        if self.slot(flow_id).loading {
            log::debug!("Vanguard analysis for {} already in flight", flow_id);
            return;
        }
        self.force_request(flow_id);
    }

    /// Trigger analysis unconditionally (forced refresh)
    ///
    /// Supersedes any in-flight request for this flow via the token rule.
    pub fn force_request(self: &Arc<Self>, flow_id: &str) {
        let token = {
            let mut tokens = self.tokens.lock();
            let counter = tokens.entry(flow_id.to_string()).or_insert(0);
            *counter += 1;
            *counter
        };

        self.slots.write().insert(
            flow_id.to_string(),
            AnalysisSlot {
                loading: true,
                report: None,
                error: None,
            },
        );
        self.subscribers.notify();

        let desk = self.clone();
        let flow_id = flow_id.to_string();
        tokio::spawn(async move {
            let result = desk.api.vanguard_analysis(&flow_id).await;
            desk.resolve(&flow_id, token, result);
        });
    }

    fn resolve(&self, flow_id: &str, token: u64, result: Result<VanguardReport, ApiError>) {
        {
            let tokens = self.tokens.lock();
            if tokens.get(flow_id).copied() != Some(token) {
                log::debug!("Discarding superseded Vanguard reply for {}", flow_id);
                return;
            }
        }

        let slot = match result {
            Ok(report) => {
                log::info!(
                    "Vanguard verdict for {}: {} ({:.1}%)",
                    flow_id,
                    report.app_type,
                    report.confidence * 100.0
                );
                AnalysisSlot {
                    loading: false,
                    report: Some(report),
                    error: None,
                }
            }
            Err(err) => {
                log::warn!("Vanguard analysis for {} failed: {}", flow_id, err);
                AnalysisSlot {
                    loading: false,
                    report: None,
                    error: Some(err),
                }
            }
        };

        self.slots.write().insert(flow_id.to_string(), slot);
        self.subscribers.notify();
    }

    /// Register a change callback
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testutil::ScriptedApi;
    use std::time::Duration;

    fn report(flow_id: &str, app_type: &str) -> VanguardReport {
        VanguardReport {
            flow_id: flow_id.to_string(),
            app_type: app_type.to_string(),
            confidence: 0.93,
            explanation: "Sustained large packets consistent with streaming".to_string(),
        }
    }

    fn desk_with(api: Arc<ScriptedApi>) -> Arc<AnalysisDesk<ScriptedApi>> {
        Arc::new(AnalysisDesk::new(api))
    }

    #[tokio::test]
    async fn test_request_populates_slot() {
        let api = Arc::new(ScriptedApi::new());
        api.push_vanguard(Duration::ZERO, Ok(report("flow_7", "video_stream")));
        let desk = desk_with(api);

        desk.request("flow_7");
        assert!(desk.slot("flow_7").loading);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let slot = desk.slot("flow_7");
        assert!(!slot.loading);
        assert_eq!(slot.report, Some(report("flow_7", "video_stream")));
        assert!(slot.error.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_lands_in_slot() {
        let api = Arc::new(ScriptedApi::new());
        api.push_vanguard(Duration::ZERO, Err(ApiError::Http(503)));
        let desk = desk_with(api);

        desk.request("flow_7");
        tokio::time::sleep(Duration::from_millis(20)).await;

        let slot = desk.slot("flow_7");
        assert!(!slot.loading);
        assert!(slot.report.is_none());
        assert_eq!(slot.error, Some(ApiError::Http(503)));
    }

    #[tokio::test]
    async fn test_slow_reply_never_crosses_targets() {
        let api = Arc::new(ScriptedApi::new());
        // flow_7's reply resolves after flow_9's
        api.push_vanguard(Duration::from_millis(80), Ok(report("flow_7", "gaming")));
        api.push_vanguard(Duration::from_millis(10), Ok(report("flow_9", "video_stream")));
        let desk = desk_with(api);

        desk.request("flow_7");
        desk.request("flow_9");
        tokio::time::sleep(Duration::from_millis(150)).await;

        let nine = desk.slot("flow_9");
        assert_eq!(nine.report, Some(report("flow_9", "video_stream")));
        let seven = desk.slot("flow_7");
        assert_eq!(seven.report, Some(report("flow_7", "gaming")));
    }

    #[tokio::test]
    async fn test_forced_refresh_discards_superseded_reply() {
        let api = Arc::new(ScriptedApi::new());
        api.push_vanguard(Duration::from_millis(80), Ok(report("flow_7", "stale")));
        api.push_vanguard(Duration::from_millis(10), Ok(report("flow_7", "fresh")));
        let desk = desk_with(api);

        desk.request("flow_7");
        desk.force_request("flow_7");
        tokio::time::sleep(Duration::from_millis(150)).await;

        // The first (older-token) reply resolved last and was discarded
        let slot = desk.slot("flow_7");
        assert!(!slot.loading);
        assert_eq!(slot.report, Some(report("flow_7", "fresh")));
    }

    #[tokio::test]
    async fn test_duplicate_trigger_coalesces() {
        let api = Arc::new(ScriptedApi::new());
        api.push_vanguard(Duration::from_millis(40), Ok(report("flow_7", "gaming")));
        let desk = desk_with(api.clone());

        desk.request("flow_7");
        desk.request("flow_7");
        desk.request("flow_7");
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(
            api.vanguard_calls.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
        assert_eq!(desk.slot("flow_7").report, Some(report("flow_7", "gaming")));
    }

    #[tokio::test]
    async fn test_focus_resets_slot_even_with_reply_in_flight() {
        let api = Arc::new(ScriptedApi::new());
        api.push_vanguard(Duration::from_millis(50), Ok(report("flow_9", "gaming")));
        let desk = desk_with(api);

        desk.request("flow_9");
        assert!(desk.slot("flow_9").loading);

        // User navigates to flow_9's detail view afresh
        desk.focus("flow_9");
        assert_eq!(desk.slot("flow_9"), AnalysisSlot::default());
        assert_eq!(desk.focused(), Some("flow_9".to_string()));

        // The in-flight reply carries a stale token and must not reappear
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(desk.slot("flow_9"), AnalysisSlot::default());
    }
}
