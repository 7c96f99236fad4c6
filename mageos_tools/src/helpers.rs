use crate::MageosApiError;

/// Strips trailing slashes from the configured base URL.
pub fn normalize_base_url(base_url: Option<&str>) -> Result<String, MageosApiError> {
    let base_url = base_url
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MageosApiError::MissingConfiguration("RELAY_COMMERCE_BASE_URL".into()))?;
    Ok(base_url.trim_end_matches('/').to_string())
}

/// Query parameters selecting the first page of orders, newest `entity_id` first.
pub fn recent_orders_criteria(page_size: u32) -> Vec<(&'static str, String)> {
    vec![
        ("searchCriteria[currentPage]", "1".to_string()),
        ("searchCriteria[pageSize]", page_size.to_string()),
        ("searchCriteria[sortOrders][0][field]", "entity_id".to_string()),
        ("searchCriteria[sortOrders][0][direction]", "DESC".to_string()),
    ]
}
