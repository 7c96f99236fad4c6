use log::*;
use mageos_tools::{MageosApi, MageosApiError, MageosConfig};
use relay_engine::{Order, OrderId, OrderSource, OrderSourceError};
use serde_json::Value;

/// Serves orders from the Mage-OS REST API.
#[derive(Clone)]
pub struct MageosOrderSource {
    api: MageosApi,
}

impl MageosOrderSource {
    pub fn new(config: MageosConfig) -> Result<Self, MageosApiError> {
        let api = MageosApi::new(config)?;
        Ok(Self { api })
    }

    fn source_error(&self, e: MageosApiError) -> OrderSourceError {
        match e {
            MageosApiError::MissingConfiguration(name) => OrderSourceError::Configuration(name),
            MageosApiError::Timeout(_) => OrderSourceError::Timeout(self.api.config().timeout),
            MageosApiError::RestRequestError(s) | MageosApiError::Initialization(s) => {
                OrderSourceError::Unreachable(s)
            },
            MageosApiError::JsonError(s) => OrderSourceError::InvalidResponse(s),
            e if e.is_auth_error() => OrderSourceError::Unauthorized(e.to_string()),
            MageosApiError::QueryError { status, message } => OrderSourceError::Upstream { status, message },
        }
    }
}

impl OrderSource for MageosOrderSource {
    async fn list_recent(&self, page_size: u32) -> Result<Vec<Order>, OrderSourceError> {
        let items = self.api.fetch_recent_orders(page_size).await.map_err(|e| self.source_error(e))?;
        Ok(orders_from_items(items))
    }

    async fn fetch_by_id(&self, order_id: &OrderId) -> Result<Order, OrderSourceError> {
        let value = self.api.fetch_order(order_id.as_str()).await.map_err(|e| {
            if e.is_not_found() {
                OrderSourceError::NotFound(order_id.to_string())
            } else {
                self.source_error(e)
            }
        })?;
        Order::from_value(value)
            .ok_or_else(|| OrderSourceError::InvalidResponse(format!("Order {order_id} is not a JSON object")))
    }
}

fn orders_from_items(items: Vec<Value>) -> Vec<Order> {
    items
        .into_iter()
        .filter_map(|item| {
            let order = Order::from_value(item);
            if order.is_none() {
                warn!("🛒️ Ignoring an order search result that is not a JSON object");
            }
            order
        })
        .collect()
}
