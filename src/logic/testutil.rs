//! Scripted transport for engine tests
//!
//! Queues one reply per expected call, each with an optional artificial
//! latency, so tests can stage slow responses, failures, and races without
//! a live backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::client::{ApiError, SyncApi};
use crate::api::types::{
    StatusSnapshot, Suggestion, SuggestionDecision, SuggestionStatus, VanguardReport,
};

type Scripted<T> = Mutex<VecDeque<(Duration, Result<T, ApiError>)>>;

#[derive(Default)]
pub(crate) struct ScriptedApi {
    status: Scripted<StatusSnapshot>,
    suggestions: Scripted<Vec<Suggestion>>,
    decisions: Scripted<SuggestionDecision>,
    vanguard: Scripted<VanguardReport>,
    pub status_calls: AtomicUsize,
    pub vanguard_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub decision_calls: Mutex<Vec<(String, SuggestionStatus)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, result: Result<StatusSnapshot, ApiError>) {
        self.status.lock().push_back((Duration::ZERO, result));
    }

    pub fn push_status_delayed(&self, delay: Duration, result: Result<StatusSnapshot, ApiError>) {
        self.status.lock().push_back((delay, result));
    }

    pub fn push_suggestions(&self, result: Result<Vec<Suggestion>, ApiError>) {
        self.suggestions.lock().push_back((Duration::ZERO, result));
    }

    pub fn push_decision(&self, result: Result<SuggestionDecision, ApiError>) {
        self.decisions.lock().push_back((Duration::ZERO, result));
    }

    pub fn push_decision_delayed(&self, delay: Duration, result: Result<SuggestionDecision, ApiError>) {
        self.decisions.lock().push_back((delay, result));
    }

    pub fn push_vanguard(&self, delay: Duration, result: Result<VanguardReport, ApiError>) {
        self.vanguard.lock().push_back((delay, result));
    }

    fn pop<T>(queue: &Scripted<T>) -> (Duration, Result<T, ApiError>) {
        queue.lock().pop_front().unwrap_or((
            Duration::ZERO,
            Err(ApiError::Unreachable("script exhausted".to_string())),
        ))
    }
}

#[async_trait]
impl SyncApi for ScriptedApi {
    async fn fetch_status(&self) -> Result<StatusSnapshot, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (delay, result) = Self::pop(&self.status);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, ApiError> {
        let (delay, result) = Self::pop(&self.suggestions);
        tokio::time::sleep(delay).await;
        result
    }

    async fn approve_suggestion(&self, id: &str) -> Result<SuggestionDecision, ApiError> {
        self.decision_calls
            .lock()
            .push((id.to_string(), SuggestionStatus::Approved));
        let (delay, result) = Self::pop(&self.decisions);
        tokio::time::sleep(delay).await;
        result
    }

    async fn deny_suggestion(&self, id: &str) -> Result<SuggestionDecision, ApiError> {
        self.decision_calls
            .lock()
            .push((id.to_string(), SuggestionStatus::Denied));
        let (delay, result) = Self::pop(&self.decisions);
        tokio::time::sleep(delay).await;
        result
    }

    async fn vanguard_analysis(&self, _flow_id: &str) -> Result<VanguardReport, ApiError> {
        self.vanguard_calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = Self::pop(&self.vanguard);
        tokio::time::sleep(delay).await;
        result
    }
}
