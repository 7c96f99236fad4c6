use thiserror::Error;

use crate::order_types::OrderId;

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Could not read the sent ledger. {0}")]
    Read(String),
    #[error("The sent ledger is corrupt. {0}")]
    Corrupt(String),
    #[error("Could not write the sent ledger. {0}")]
    Write(String),
}

/// Durable backing store for the [`crate::SentLedger`].
pub trait LedgerStorage {
    /// Returns `Ok(None)` if nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<OrderId>>, LedgerError>;
    /// Replace the stored set with `ids`. Must not return until the data is durable.
    fn save(&self, ids: &[OrderId]) -> Result<(), LedgerError>;
    /// A human-readable description of where the ledger lives, e.g. a file path.
    fn location(&self) -> String;
}
