use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::order_types::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// The target answered with a success status.
    Delivered,
    /// The target answered, but not with a success status.
    Rejected,
    /// No answer: connection failure, timeout and the like.
    Unreachable,
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivered => f.write_str("delivered"),
            Self::Rejected => f.write_str("rejected"),
            Self::Unreachable => f.write_str("unreachable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardResult {
    pub status: DeliveryStatus,
    pub http_status: Option<u16>,
    pub detail: String,
    /// The target's JSON response body, if it sent one.
    pub response: Option<Value>,
}

impl ForwardResult {
    pub fn delivered(http_status: u16, response: Option<Value>) -> Self {
        Self { status: DeliveryStatus::Delivered, http_status: Some(http_status), detail: "delivered".into(), response }
    }

    pub fn rejected<S: Display>(http_status: u16, detail: S, response: Option<Value>) -> Self {
        Self { status: DeliveryStatus::Rejected, http_status: Some(http_status), detail: detail.to_string(), response }
    }

    pub fn unreachable<S: Display>(detail: S) -> Self {
        Self { status: DeliveryStatus::Unreachable, http_status: None, detail: detail.to_string(), response: None }
    }

    pub fn is_delivered(&self) -> bool {
        self.status == DeliveryStatus::Delivered
    }
}

/// Delivers one order to the downstream target.
///
/// Implementations never fail: every transport problem is reported as [`DeliveryStatus::Unreachable`].
#[allow(async_fn_in_trait)]
pub trait Forwarder {
    async fn forward(&self, order: &Order, destination: &str) -> ForwardResult;
}
