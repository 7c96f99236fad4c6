use std::time::Duration;

use thiserror::Error;

use crate::order_types::{Order, OrderId};

#[derive(Debug, Clone, Error)]
pub enum OrderSourceError {
    #[error("{0} is required")]
    Configuration(String),
    #[error("The order source rejected our credentials. {0}")]
    Unauthorized(String),
    #[error("Order {0} was not found")]
    NotFound(String),
    #[error("The order source could not be reached. {0}")]
    Unreachable(String),
    #[error("The order source did not respond within {0:?}")]
    Timeout(Duration),
    #[error("Commerce fetch failed ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("The order source returned an invalid response. {0}")]
    InvalidResponse(String),
}

#[allow(async_fn_in_trait)]
pub trait OrderSource {
    /// Fetch the most recent `page_size` orders, newest identifier first. An empty page is not an error.
    async fn list_recent(&self, page_size: u32) -> Result<Vec<Order>, OrderSourceError>;
    async fn fetch_by_id(&self, order_id: &OrderId) -> Result<Order, OrderSourceError>;
}
