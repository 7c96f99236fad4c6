use std::time::Duration;

use log::*;
use relay_engine::{ForwardResult, Forwarder, Order};
use reqwest::Client;
use serde_json::{json, Value};

pub const PAYLOAD_SOURCE: &str = "mageos";

/// POSTs each order to the target as JSON.
///
/// The payload carries a few well-known order fields at the top level and the complete order under `raw`. Any 2xx
/// answer counts as delivered. Connection failures and timeouts are reported as unreachable rather than as errors.
#[derive(Clone)]
pub struct HttpForwarder {
    client: Client,
    id_field: String,
}

impl HttpForwarder {
    pub fn new(timeout: Duration, id_field: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, id_field: id_field.to_string() })
    }

    pub fn payload(&self, order: &Order) -> Value {
        forward_payload(order, &self.id_field)
    }
}

impl Forwarder for HttpForwarder {
    async fn forward(&self, order: &Order, destination: &str) -> ForwardResult {
        let payload = self.payload(order);
        trace!("📦️ Forwarding order {} to {destination}", payload["order_id"]);
        let response = match self.client.post(destination).json(&payload).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("📦️ Could not reach {destination}. {e}");
                return ForwardResult::unreachable(format!("Target unreachable: {e}"));
            },
        };
        let status = response.status();
        // Non-JSON bodies are dropped
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
            Err(e) => {
                debug!("📦️ Could not read the response body from {destination}. {e}");
                None
            },
        };
        if status.is_success() {
            ForwardResult::delivered(status.as_u16(), body)
        } else {
            ForwardResult::rejected(status.as_u16(), format!("Target responded with {status}"), body)
        }
    }
}

/// `{source, order_id, increment_id, status, grand_total, customer_email, created_at, raw}`. Fields missing from the
/// order are sent as `null`.
pub fn forward_payload(order: &Order, id_field: &str) -> Value {
    let field = |name: &str| order.get(name).cloned().unwrap_or(Value::Null);
    json!({
        "source": PAYLOAD_SOURCE,
        "order_id": field(id_field),
        "increment_id": field("increment_id"),
        "status": field("status"),
        "grand_total": field("grand_total"),
        "customer_email": field("customer_email"),
        "created_at": field("created_at"),
        "raw": order,
    })
}
