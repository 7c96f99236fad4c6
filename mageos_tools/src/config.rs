use std::time::Duration;

use log::*;
use relay_common::{helpers::non_empty, Secret};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct MageosConfig {
    /// e.g. `https://example.local/rest/default/V1`
    pub base_url: Option<String>,
    pub access_token: Option<Secret<String>>,
    pub timeout: Duration,
}

impl Default for MageosConfig {
    fn default() -> Self {
        Self { base_url: None, access_token: None, timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

impl MageosConfig {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            base_url: Some(base_url.to_string()),
            access_token: Some(Secret::new(access_token.to_string())),
            ..Default::default()
        }
    }

    /// Missing values are not fatal here. Requests made without them fail with
    /// [`crate::MageosApiError::MissingConfiguration`], so the rest of the server keeps working.
    pub fn new_from_env_or_default() -> Self {
        let base_url = non_empty(std::env::var("RELAY_COMMERCE_BASE_URL").ok());
        if base_url.is_none() {
            warn!("🛒️ RELAY_COMMERCE_BASE_URL not set. Polling will fail until it is configured.");
        }
        let access_token = non_empty(std::env::var("RELAY_COMMERCE_ACCESS_TOKEN").ok()).map(Secret::from);
        if access_token.is_none() {
            warn!("🛒️ RELAY_COMMERCE_ACCESS_TOKEN not set. Polling will fail until it is configured.");
        }
        Self { base_url, access_token, timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
