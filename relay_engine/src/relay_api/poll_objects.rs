use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    order_types::OrderId,
    traits::{DeliveryStatus, ForwardResult, LedgerError},
    RelayError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Timer,
    Manual,
}

impl Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timer => f.write_str("timer"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Skipped, the order is already in the ledger.
    AlreadySent,
    Delivered,
    /// Delivered, but the ledger write failed. The order may be sent again after a restart.
    DeliveredNotMarked,
    Rejected,
    Unreachable,
    /// Skipped, the order has no usable identifier.
    MissingIdentifier,
}

/// What happened to one order during a poll cycle or a manual forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOutcome {
    pub order_id: Option<OrderId>,
    pub attempted: bool,
    pub delivered: bool,
    pub marked: bool,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_response: Option<Value>,
}

impl PollOutcome {
    /// `stored` is false while the mark is only held in memory, waiting for a successful ledger write.
    pub fn already_sent(order_id: OrderId, stored: bool) -> Self {
        let detail = if stored { "already sent" } else { "already sent, but the mark is not yet written to the ledger" };
        Self {
            order_id: Some(order_id),
            attempted: false,
            delivered: false,
            marked: stored,
            status: OutcomeStatus::AlreadySent,
            http_status: None,
            detail: detail.into(),
            target_response: None,
        }
    }

    pub fn missing_identifier(id_field: &str) -> Self {
        Self {
            order_id: None,
            attempted: false,
            delivered: false,
            marked: false,
            status: OutcomeStatus::MissingIdentifier,
            http_status: None,
            detail: format!("order has no usable '{id_field}' field"),
            target_response: None,
        }
    }

    /// An attempted forward that was marked in the ledger.
    pub fn delivered(order_id: OrderId, result: ForwardResult) -> Self {
        Self::attempted(order_id, OutcomeStatus::Delivered, true, result.detail.clone(), result)
    }

    pub fn delivered_not_marked(order_id: OrderId, result: ForwardResult, error: &LedgerError) -> Self {
        let detail = format!("delivered, but not marked as sent. {error}");
        Self::attempted(order_id, OutcomeStatus::DeliveredNotMarked, false, detail, result)
    }

    /// An attempted forward that did not succeed.
    pub fn failed(order_id: OrderId, result: ForwardResult) -> Self {
        let status = match result.status {
            DeliveryStatus::Unreachable => OutcomeStatus::Unreachable,
            _ => OutcomeStatus::Rejected,
        };
        Self::attempted(order_id, status, false, result.detail.clone(), result)
    }

    fn attempted(order_id: OrderId, status: OutcomeStatus, marked: bool, detail: String, result: ForwardResult) -> Self {
        Self {
            order_id: Some(order_id),
            attempted: true,
            delivered: result.is_delivered(),
            marked,
            status,
            http_status: result.http_status,
            detail,
            target_response: result.response,
        }
    }
}

/// The outcomes of one poll cycle, in the order the orders were processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollReport {
    pub outcomes: Vec<PollOutcome>,
}

impl PollReport {
    pub fn new(outcomes: Vec<PollOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn attempted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.attempted).count()
    }

    pub fn delivered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.delivered).count()
    }

    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn outcome_for(&self, order_id: &OrderId) -> Option<&PollOutcome> {
        self.outcomes.iter().find(|o| o.order_id.as_ref() == Some(order_id))
    }
}

/// A short record of the last poll cycle, kept for the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub trigger: Trigger,
    pub finished_at: DateTime<Utc>,
    pub orders_seen: usize,
    pub attempted: usize,
    pub delivered: usize,
    pub not_marked: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CycleSummary {
    pub fn new(trigger: Trigger, result: &Result<PollReport, RelayError>) -> Self {
        let finished_at = Utc::now();
        match result {
            Ok(report) => Self {
                trigger,
                finished_at,
                orders_seen: report.outcomes.len(),
                attempted: report.attempted_count(),
                delivered: report.delivered_count(),
                not_marked: report.count(OutcomeStatus::DeliveredNotMarked),
                error: None,
            },
            Err(e) => Self {
                trigger,
                finished_at,
                orders_seen: 0,
                attempted: 0,
                delivered: 0,
                not_marked: 0,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl Display for CycleSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            Some(e) => write!(f, "[{}] cycle failed: {e}", self.trigger),
            None => write!(
                f,
                "[{}] {} orders seen, {} attempted, {} delivered, {} not marked",
                self.trigger, self.orders_seen, self.attempted, self.delivered, self.not_marked
            ),
        }
    }
}
