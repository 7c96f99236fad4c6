use thiserror::Error;

use crate::traits::{LedgerError, OrderSourceError};

#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("{0}")]
    Source(#[from] OrderSourceError),
    #[error("{0}")]
    Ledger(#[from] LedgerError),
}
