use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use relay_engine::{OrderSourceError, RelayError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    ConfigurationError(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("{0}")]
    NoRecordFound(String),
    /// The commerce API failed or could not be reached.
    #[error("{0}")]
    UpstreamError(String),
    /// The sent ledger could not be read or written.
    #[error("{0}")]
    BackendError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "ok": false, "error": self.to_string() }).to_string())
    }
}

impl From<OrderSourceError> for ServerError {
    fn from(e: OrderSourceError) -> Self {
        match e {
            OrderSourceError::Configuration(_) => Self::ConfigurationError(e.to_string()),
            OrderSourceError::NotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderSourceError::Unauthorized(_)
            | OrderSourceError::Unreachable(_)
            | OrderSourceError::Timeout(_)
            | OrderSourceError::Upstream { .. }
            | OrderSourceError::InvalidResponse(_) => Self::UpstreamError(e.to_string()),
        }
    }
}

impl From<RelayError> for ServerError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::Source(e) => e.into(),
            RelayError::Ledger(e) => Self::BackendError(e.to_string()),
        }
    }
}
