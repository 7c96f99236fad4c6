use std::fmt::Display;

use relay_engine::{
    poll_objects::{CycleSummary, PollOutcome, PollReport},
    OrderId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub ok: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { ok: true, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub sent_count: usize,
    /// Some marks are only held in memory because the last ledger write failed.
    pub ledger_pending: bool,
    pub target_url: String,
    pub sent_file: String,
    /// 0 when the background poll is disabled.
    pub poll_interval_ms: u64,
    pub last_cycle: Option<CycleSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentIdsResponse {
    pub ok: bool,
    pub sent_order_ids: Vec<OrderId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOnceResponse {
    pub ok: bool,
    pub forwarded_attempts: usize,
    pub delivered: usize,
    pub results: Vec<PollOutcome>,
}

impl From<PollReport> for PollOnceResponse {
    fn from(report: PollReport) -> Self {
        Self {
            ok: true,
            forwarded_attempts: report.attempted_count(),
            delivered: report.delivered_count(),
            results: report.outcomes,
        }
    }
}

/// The result of a manual forward. `ok` is true iff the target accepted the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub outcome: PollOutcome,
}

impl From<PollOutcome> for ForwardResponse {
    fn from(outcome: PollOutcome) -> Self {
        Self { ok: outcome.delivered, outcome }
    }
}

/// What the dummy target echoes back about the order it received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceivedOrder {
    pub order_id: Option<Value>,
    pub increment_id: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetReceipt {
    pub ok: bool,
    #[serde(rename = "ref")]
    pub reference: String,
    pub received: ReceivedOrder,
}
