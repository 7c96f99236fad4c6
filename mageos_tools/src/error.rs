use thiserror::Error;

#[derive(Debug, Error)]
pub enum MageosApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("{0} is required")]
    MissingConfiguration(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("The commerce API did not respond in time: {0}")]
    Timeout(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Commerce fetch failed ({status}): {message}")]
    QueryError { status: u16, message: String },
}

impl MageosApiError {
    /// True when the platform refused the access token.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::QueryError { status: 401 | 403, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::QueryError { status: 404, .. })
    }
}
