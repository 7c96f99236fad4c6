use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The envelope returned by `GET /orders?searchCriteria...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSearchResult {
    #[serde(default)]
    pub items: Value,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl OrderSearchResult {
    /// The orders on this page. Anything other than an array is treated as an empty page.
    pub fn into_items(self) -> Vec<Value> {
        match self.items {
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    }
}
