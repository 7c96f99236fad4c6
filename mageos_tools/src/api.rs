use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::MageosConfig,
    data_objects::OrderSearchResult,
    helpers::{normalize_base_url, recent_orders_criteria},
    MageosApiError,
};

#[derive(Clone)]
pub struct MageosApi {
    config: MageosConfig,
    client: Arc<Client>,
}

impl MageosApi {
    pub fn new(config: MageosConfig) -> Result<Self, MageosApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MageosApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MageosConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MageosApiError> {
        let url = self.url(path)?;
        let token = self
            .config
            .access_token
            .as_ref()
            .ok_or_else(|| MageosApiError::MissingConfiguration("RELAY_COMMERCE_ACCESS_TOKEN".into()))?;
        trace!("🛒️ Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url).bearer_auth(token.reveal());
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                MageosApiError::Timeout(e.to_string())
            } else {
                MageosApiError::RestRequestError(e.to_string())
            }
        })?;
        let status = response.status();
        if status.is_success() {
            trace!("🛒️ REST query successful. {status}");
            response.json::<T>().await.map_err(|e| MageosApiError::JsonError(e.to_string()))
        } else {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() { status.canonical_reason().unwrap_or_default().to_string() } else { text };
            Err(MageosApiError::QueryError { status: status.as_u16(), message })
        }
    }

    pub fn url(&self, path: &str) -> Result<String, MageosApiError> {
        let base = normalize_base_url(self.config.base_url.as_deref())?;
        Ok(format!("{base}{path}"))
    }

    /// Fetches the first page of orders, sorted by `entity_id`, newest first.
    pub async fn fetch_recent_orders(&self, page_size: u32) -> Result<Vec<Value>, MageosApiError> {
        debug!("🛒️ Fetching the {page_size} most recent orders");
        let params = recent_orders_criteria(page_size);
        let result = self.rest_query::<OrderSearchResult>(Method::GET, "/orders", &params).await?;
        let orders = result.into_items();
        debug!("🛒️ Fetched {} orders", orders.len());
        Ok(orders)
    }

    pub async fn fetch_order(&self, order_id: &str) -> Result<Value, MageosApiError> {
        let path = format!("/orders/{}", urlencoding::encode(order_id));
        debug!("🛒️ Fetching order #{order_id}");
        let order = self.rest_query::<Value>(Method::GET, &path, &[]).await?;
        info!("🛒️ Fetched order #{order_id}");
        Ok(order)
    }
}
