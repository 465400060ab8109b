//! Fallback Snapshot Synthesizer
//!
//! When the backend is completely unreachable the poller swaps in a
//! synthesized snapshot instead of blanking the console. The output
//! validates against the same schema as real data: all four metric classes
//! present, counts within documented bounds, every required field populated.
//! Synthetic identifiers carry a `demo-` prefix so they can never be
//! mistaken for backend `flow_XXX` ids in postmortem debugging.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::api::types::{
    ClassMetrics, ClassificationLogEntry, Engine, Flow, Metrics, Policy, StatusSnapshot,
};

/// Prefix for every synthetic identifier
pub const DEMO_ID_PREFIX: &str = "demo-";

/// Maximum number of synthetic flows per snapshot
pub const MAX_DEMO_FLOWS: usize = 5;

/// Log entries carried over from the previous snapshot, matching the
/// orchestrator's own `/status` log window.
const LOG_CARRY_LIMIT: usize = 10;

const APP_TYPES: [&str; 4] = ["video_stream", "gaming", "file_transfer", "best_effort"];

/// Produce a structurally complete synthetic snapshot
///
/// Values vary between calls; structure never does. `previous` only feeds
/// the classification log so the ticker stays continuous across consecutive
/// fallback cycles.
pub fn synthesize(previous: Option<&StatusSnapshot>, now: DateTime<Utc>) -> StatusSnapshot {
    let mut rng = rand::thread_rng();

    let flow_count = rng.gen_range(1..=MAX_DEMO_FLOWS);
    let active_flows: Vec<Flow> = (0..flow_count).map(demo_flow).collect();

    let active_policies = active_flows
        .iter()
        .map(|flow| {
            let (dscp_class, tc_class) = policy_classes(&flow.app_type);
            Policy {
                flow_id: flow.id.clone(),
                app_type: flow.app_type.to_string(),
                dscp_class: dscp_class.to_string(),
                tc_class: tc_class.to_string(),
                explanation: Some("Synthesized while backend unreachable".to_string()),
            }
        })
        .collect();

    let classification_log = match previous {
        Some(prev) if !prev.classification_log.is_empty() => {
            let mut log = prev.classification_log.clone();
            log.truncate(LOG_CARRY_LIMIT);
            log
        }
        _ => seed_log(now),
    };

    StatusSnapshot {
        active_flows,
        classification_log,
        active_policies,
        metrics: Metrics {
            high_prio: class_metrics(&mut rng, 2000..7000, 50..150),
            video_stream: class_metrics(&mut rng, 3000..11000, 100..300),
            best_effort: class_metrics(&mut rng, 8000..23000, 75..225),
            low_prio: class_metrics(&mut rng, 1000..4000, 20..70),
        },
        investigations: Vec::new(),
    }
}

fn class_metrics(
    rng: &mut impl Rng,
    packets: std::ops::Range<u64>,
    bandwidth: std::ops::Range<u64>,
) -> ClassMetrics {
    ClassMetrics {
        packets: rng.gen_range(packets),
        bandwidth: rng.gen_range(bandwidth),
    }
}

fn demo_flow(index: usize) -> Flow {
    let suffix = Uuid::new_v4().simple().to_string();
    Flow {
        id: format!("{}{}", DEMO_ID_PREFIX, &suffix[..8]),
        source_ip: format!("192.168.1.{}", 100 + index),
        dest_ip: format!("203.0.113.{}", 45 + index),
        dest_port: 8000 + index as u16,
        status: if index % 2 == 0 { "established" } else { "open" }.to_string(),
        app_type: APP_TYPES[index % APP_TYPES.len()].to_string(),
        engine: Some(if index % 2 == 0 {
            Engine::Sentry
        } else {
            Engine::Vanguard
        }),
    }
}

fn policy_classes(app_type: &str) -> (&'static str, &'static str) {
    match app_type {
        "video_stream" => ("AF41", "1:10"),
        "gaming" => ("EF", "1:20"),
        "file_transfer" => ("AF11", "1:30"),
        _ => ("CS0", "1:40"),
    }
}

fn seed_log(now: DateTime<Utc>) -> Vec<ClassificationLogEntry> {
    vec![
        ClassificationLogEntry {
            timestamp: now - Duration::seconds(30),
            message: "Classified video streaming traffic (confidence: 94.2%)".to_string(),
            explanation: Some("High bandwidth usage pattern detected".to_string()),
            engine: Some(Engine::Sentry),
        },
        ClassificationLogEntry {
            timestamp: now - Duration::seconds(45),
            message: "Complex traffic pattern analyzed (confidence: 97.8%)".to_string(),
            explanation: Some(
                "Analysis identified gaming traffic with low latency requirements".to_string(),
            ),
            engine: Some(Engine::Vanguard),
        },
        ClassificationLogEntry {
            timestamp: now - Duration::seconds(60),
            message: "Bulk transfer classified as best effort (confidence: 89.1%)".to_string(),
            explanation: Some("Large file transfer pattern with no time sensitivity".to_string()),
            engine: Some(Engine::Sentry),
        },
    ]
}
