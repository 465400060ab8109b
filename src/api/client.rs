//! Backend API Client
//!
//! HTTP transport for the Sentinel orchestrator. Issues typed requests,
//! classifies every failure into exactly one [`ApiError`] kind, and carries
//! no retry or caching policy of its own. Backoff and fallback decisions
//! belong to the callers (poller, suggestion board, analysis desk).

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use super::types::{
    ClassificationResult, FlowFeatures, SimulationOutcome, SimulationParams, StatusSnapshot,
    Suggestion, SuggestionDecision, VanguardReport,
};
use crate::logic::config::SyncConfig;

/// Transport failure taxonomy
///
/// The classification is total: every failed request maps to exactly one
/// variant. `Unreachable` is reserved for "no response was obtainable";
/// a reachable backend that misbehaves surfaces as `Http` or `Malformed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No server response at all: connection refused, DNS failure, timeout
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    /// Server responded with a non-success status
    #[error("backend returned HTTP {0}")]
    Http(u16),
    /// Response body could not be parsed as the expected shape
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// Typed client for the orchestrator's HTTP contract
///
/// Explicitly constructed and injectable; admin credentials live on the
/// instance instead of a process-wide header variable.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    admin_credentials: RwLock<Option<(String, String)>>,
}

impl ApiClient {
    /// Create a client from config
    pub fn new(config: &SyncConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http,
            admin_credentials: RwLock::new(None),
        }
    }

    /// Set Basic-auth credentials for privileged admin endpoints
    pub fn set_admin_credentials(&self, username: &str, password: &str) {
        *self.admin_credentials.write() = Some((username.to_string(), password.to_string()));
    }

    /// Drop admin credentials; subsequent admin requests go out unauthenticated
    pub fn clear_admin_credentials(&self) {
        *self.admin_credentials.write() = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_admin_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.admin_credentials.read().as_ref() {
            Some((user, pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    /// Send a request and decode the reply, mapping every failure mode
    /// onto the taxonomy.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// `GET /status` - full system snapshot
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, ApiError> {
        self.execute(self.http.get(self.url("/status"))).await
    }

    /// `POST /classify` - classify a flow from its feature vector
    pub async fn classify(&self, features: &FlowFeatures) -> Result<ClassificationResult, ApiError> {
        self.execute(self.http.post(self.url("/classify")).json(features))
            .await
    }

    /// `POST /simulate` - run a what-if traffic scenario
    pub async fn run_simulation(
        &self,
        params: &SimulationParams,
    ) -> Result<SimulationOutcome, ApiError> {
        self.execute(self.http.post(self.url("/simulate")).json(params))
            .await
    }

    /// `GET /suggestions` - list policy suggestions
    pub async fn list_suggestions(&self) -> Result<Vec<Suggestion>, ApiError> {
        self.execute(self.http.get(self.url("/suggestions"))).await
    }

    /// `POST /suggestions/{id}/approve`
    pub async fn approve_suggestion(&self, id: &str) -> Result<SuggestionDecision, ApiError> {
        let url = self.url(&format!("/suggestions/{}/approve", id));
        self.execute(self.http.post(url)).await
    }

    /// `POST /suggestions/{id}/deny`
    pub async fn deny_suggestion(&self, id: &str) -> Result<SuggestionDecision, ApiError> {
        let url = self.url(&format!("/suggestions/{}/deny", id));
        self.execute(self.http.post(url)).await
    }

    /// `POST /investigations/{flow_id}/vanguard` - on-demand deep analysis
    pub async fn vanguard_analysis(&self, flow_id: &str) -> Result<VanguardReport, ApiError> {
        let url = self.url(&format!("/investigations/{}/vanguard", flow_id));
        self.execute(self.http.post(url)).await
    }

    /// `POST /admin/simulate` - toggle backend traffic simulation (privileged)
    pub async fn set_simulation(&self, enabled: bool) -> Result<serde_json::Value, ApiError> {
        let builder = self
            .http
            .post(self.url("/admin/simulate"))
            .form(&[("enabled", enabled.to_string())]);
        self.execute(self.with_admin_auth(builder)).await
    }

    /// `POST /admin/upload-model` - upload a new classifier model (privileged)
    pub async fn upload_model(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let builder = self.http.post(self.url("/admin/upload-model")).multipart(form);
        self.execute(self.with_admin_auth(builder)).await
    }
}

/// Transport operations the sync engines depend on
///
/// Seam for injecting a scripted transport in tests; `ApiClient` is the
/// production implementation.
#[async_trait]
pub trait SyncApi: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusSnapshot, ApiError>;
    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, ApiError>;
    async fn approve_suggestion(&self, id: &str) -> Result<SuggestionDecision, ApiError>;
    async fn deny_suggestion(&self, id: &str) -> Result<SuggestionDecision, ApiError>;
    async fn vanguard_analysis(&self, flow_id: &str) -> Result<VanguardReport, ApiError>;
}

#[async_trait]
impl SyncApi for ApiClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot, ApiError> {
        ApiClient::fetch_status(self).await
    }

    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, ApiError> {
        ApiClient::list_suggestions(self).await
    }

    async fn approve_suggestion(&self, id: &str) -> Result<SuggestionDecision, ApiError> {
        ApiClient::approve_suggestion(self, id).await
    }

    async fn deny_suggestion(&self, id: &str) -> Result<SuggestionDecision, ApiError> {
        ApiClient::deny_suggestion(self, id).await
    }

    async fn vanguard_analysis(&self, flow_id: &str) -> Result<VanguardReport, ApiError> {
        ApiClient::vanguard_analysis(self, flow_id).await
    }
}
