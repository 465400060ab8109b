//! Wire Data Model
//!
//! Typed mirror of the orchestrator's JSON contract. Everything the engine
//! holds locally is deserialized into these shapes at the transport boundary;
//! untyped values never travel past `api::client`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification engine that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engine {
    Sentry,
    Vanguard,
}

/// Single active network flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub source_ip: String,
    pub dest_ip: String,
    pub dest_port: u16,
    pub status: String,
    pub app_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<Engine>,
}

/// Entry in the rolling classification log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationLogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<Engine>,
}

/// QoS policy applied to a flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub flow_id: String,
    pub app_type: String,
    pub dscp_class: String,
    pub tc_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Packet and bandwidth counters for one priority class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub packets: u64,
    pub bandwidth: u64,
}

/// Per-class traffic metrics
///
/// All four priority classes are plain struct fields, so a snapshot can
/// never carry a partial metrics record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub high_prio: ClassMetrics,
    pub video_stream: ClassMetrics,
    pub best_effort: ClassMetrics,
    pub low_prio: ClassMetrics,
}

/// Investigation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestigationStatus {
    Open,
    InProgress,
    Resolved,
    Escalated,
}

/// Deep-dive record for an escalated flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investigation {
    pub id: String,
    pub flow_id: String,
    pub timestamp: DateTime<Utc>,
    pub details: String,
    pub status: InvestigationStatus,
    /// Feature-attribution map (feature name -> signed contribution)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shap: Option<BTreeMap<String, f64>>,
}

/// Full point-in-time view returned by `GET /status`
///
/// Replaced wholesale on every successful poll; never merged field-by-field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub active_flows: Vec<Flow>,
    #[serde(default)]
    pub classification_log: Vec<ClassificationLogEntry>,
    #[serde(default)]
    pub active_policies: Vec<Policy>,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub investigations: Vec<Investigation>,
}

/// Suggestion lifecycle state
///
/// `Pending` is the only non-terminal state; the backend accepts exactly
/// one approve or deny per suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Denied,
}

impl SuggestionStatus {
    /// Terminal states cannot be re-entered
    pub fn is_terminal(self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

/// Crowd-sourced policy suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub profile_id: String,
    pub suggested_app: String,
    pub suggested_dscp: String,
    pub suggested_tc: String,
    pub rationale: String,
    #[serde(default)]
    pub votes: u64,
    pub status: SuggestionStatus,
}

/// Authoritative reply to an approve/deny request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionDecision {
    pub id: String,
    pub status: SuggestionStatus,
}

/// Feature vector describing a flow, payload for `POST /classify`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowFeatures {
    pub source_ip: String,
    pub dest_ip: String,
    pub dest_port: u16,
    pub packet_count: u64,
    pub avg_pkt_len: f64,
    pub duration_seconds: f64,
    pub bytes_total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// Verdict returned by `POST /classify`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub flow_id: String,
    pub app_type: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<Engine>,
}

/// What-if scenario parameters for `POST /simulate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub video_percentage: f64,
    pub total_volume_gb: u64,
}

/// Aggregated classification counts from a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub simulation_results: BTreeMap<String, u64>,
    pub num_samples: u64,
}

/// Natural-language verdict from the Vanguard deep-analysis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VanguardReport {
    pub flow_id: String,
    pub app_type: String,
    pub confidence: f64,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_snapshot_defaults_are_complete() {
        let snap = StatusSnapshot::default();
        assert!(snap.active_flows.is_empty());
        assert_eq!(snap.metrics.high_prio.packets, 0);
        assert_eq!(snap.metrics.low_prio.bandwidth, 0);
    }

    #[test]
    fn test_suggestion_status_wire_format() {
        let s: SuggestionStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(s, SuggestionStatus::Approved);
        assert!(s.is_terminal());
        assert!(!SuggestionStatus::Pending.is_terminal());
    }

    #[test]
    fn test_investigation_status_kebab_case() {
        let s: InvestigationStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(s, InvestigationStatus::InProgress);
    }

    #[test]
    fn test_snapshot_tolerates_missing_sections() {
        // Older orchestrator builds omit investigations entirely
        let snap: StatusSnapshot = serde_json::from_str(
            r#"{"active_flows":[],"classification_log":[],"active_policies":[],
                "metrics":{"high_prio":{"packets":1,"bandwidth":2},
                           "video_stream":{"packets":3,"bandwidth":4},
                           "best_effort":{"packets":5,"bandwidth":6},
                           "low_prio":{"packets":7,"bandwidth":8}}}"#,
        )
        .unwrap();
        assert!(snap.investigations.is_empty());
        assert_eq!(snap.metrics.best_effort.packets, 5);
    }
}
