//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To point the engine at a different backend, only edit this file
//! or set the corresponding environment variables.

/// Default backend URL
///
/// This is the fallback URL when no environment variable is set.
/// The orchestrator listens on port 8000 in development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default status poll interval (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Default HTTP request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Sentinel Console Sync";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get backend URL from environment or use default
pub fn api_url() -> String {
    std::env::var("SENTINEL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get poll interval from environment or use default
pub fn poll_interval_ms() -> u64 {
    std::env::var("SENTINEL_POLL_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
}

/// Get request timeout from environment or use default
pub fn request_timeout_secs() -> u64 {
    std::env::var("SENTINEL_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
}
