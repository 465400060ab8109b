//! Engine configuration

use std::time::Duration;

use crate::constants;

/// Sync engine configuration
///
/// Defaults come from the environment with `constants` fallbacks, the same
/// knobs the demo binary reads at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Backend base URL
    pub api_url: String,
    /// Status poll interval
    pub poll_interval: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: constants::api_url(),
            poll_interval: Duration::from_millis(constants::poll_interval_ms()),
            request_timeout: Duration::from_secs(constants::request_timeout_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert!(!config.api_url.is_empty());
        assert!(config.poll_interval >= Duration::from_millis(1));
    }
}
